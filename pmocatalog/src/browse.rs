//! # ContentDirectory - Façade de navigation
//!
//! Point d'entrée du serveur HTTP/SOAP : résolution d'un identifiant depuis
//! une racine fraîche, pagination des enfants, recherche par classe et
//! projection en DIDL-Lite.
//!
//! ## Fonctionnalités
//!
//! - **Resolve** : identifiant → nœud, les conteneurs fixes sans parcours
//! - **Browse** : `BrowseMetadata` et `BrowseDirectChildren`
//! - **Search** : parcours récursif filtré par `upnp:class derivedfrom`
//!
//! L'arbre n'est jamais conservé d'une requête à l'autre et n'a pas de
//! suivi des modifications : l'`UpdateID` vaut toujours 0.

use crate::device::DeviceSignature;
use crate::library::{MediaLibrary, User};
use crate::node::Node;
use crate::projection::Projector;
use crate::registry::WellKnown;
use crate::settings::CatalogSettings;
use crate::{CatalogError, Result};
use pmodidl::{DIDLLite, MediaObject};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Mode de la requête Browse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseFlag {
    /// Métadonnées de l'objet lui-même
    Metadata,
    /// Enfants directs de l'objet
    DirectChildren,
}

impl BrowseFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowseFlag::Metadata => "BrowseMetadata",
            BrowseFlag::DirectChildren => "BrowseDirectChildren",
        }
    }
}

impl FromStr for BrowseFlag {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "BrowseMetadata" => Ok(BrowseFlag::Metadata),
            "BrowseDirectChildren" => Ok(BrowseFlag::DirectChildren),
            other => Err(CatalogError::InvalidBrowseFlag(other.to_string())),
        }
    }
}

impl fmt::Display for BrowseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paramètres d'une action Browse
#[derive(Debug, Clone)]
pub struct BrowseRequest {
    pub object_id: String,
    pub browse_flag: BrowseFlag,
    pub starting_index: u32,
    /// 0 : tous les enfants
    pub requested_count: u32,
    pub signature: DeviceSignature,
    pub user: User,
}

impl BrowseRequest {
    pub fn new(object_id: impl Into<String>, browse_flag: BrowseFlag) -> Self {
        Self {
            object_id: object_id.into(),
            browse_flag,
            starting_index: 0,
            requested_count: 0,
            signature: DeviceSignature::Unknown,
            user: User::default(),
        }
    }

    pub fn with_range(mut self, starting_index: u32, requested_count: u32) -> Self {
        self.starting_index = starting_index;
        self.requested_count = requested_count;
        self
    }

    pub fn with_signature(mut self, signature: DeviceSignature) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }
}

/// Paramètres d'une action Search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub container_id: String,
    /// Critère UPnP, par exemple `upnp:class derivedfrom "object.item.audioItem"`
    pub search_criteria: String,
    pub starting_index: u32,
    pub requested_count: u32,
    pub signature: DeviceSignature,
    pub user: User,
}

impl SearchRequest {
    pub fn new(container_id: impl Into<String>, search_criteria: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            search_criteria: search_criteria.into(),
            starting_index: 0,
            requested_count: 0,
            signature: DeviceSignature::Unknown,
            user: User::default(),
        }
    }

    pub fn with_range(mut self, starting_index: u32, requested_count: u32) -> Self {
        self.starting_index = starting_index;
        self.requested_count = requested_count;
        self
    }

    pub fn with_signature(mut self, signature: DeviceSignature) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }
}

/// Réponse Browse/Search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResponse {
    /// Document DIDL-Lite
    pub result: String,
    pub number_returned: u32,
    pub total_matches: u32,
    pub update_id: u32,
}

impl BrowseResponse {
    fn from_objects(objects: Vec<MediaObject>, total_matches: usize) -> Result<Self> {
        let didl = DIDLLite::from_objects(objects);
        Ok(Self {
            number_returned: u32::try_from(didl.len()).unwrap_or(u32::MAX),
            total_matches: u32::try_from(total_matches).unwrap_or(u32::MAX),
            result: didl.to_xml()?,
            update_id: 0,
        })
    }
}

/// Extrait les préfixes de classe d'un critère de recherche UPnP
///
/// Seules les clauses `derivedfrom "..."` sont retenues, dans l'ordre.
///
/// ```
/// use pmocatalog::parse_derived_from;
///
/// let prefixes = parse_derived_from(
///     r#"upnp:class derivedfrom "object.item.audioItem" or upnp:class derivedfrom "object.item.videoItem""#,
/// );
/// assert_eq!(prefixes, vec!["object.item.audioItem", "object.item.videoItem"]);
/// ```
pub fn parse_derived_from(criteria: &str) -> Vec<String> {
    const KEYWORD: &str = "derivedfrom";
    // to_ascii_lowercase conserve les positions en octets
    let lower = criteria.to_ascii_lowercase();
    let mut prefixes = Vec::new();
    let mut cursor = 0;

    while let Some(pos) = lower[cursor..].find(KEYWORD) {
        let after = cursor + pos + KEYWORD.len();
        let Some(open) = criteria[after..].find('"') else {
            break;
        };
        let start = after + open + 1;
        let Some(len) = criteria[start..].find('"') else {
            break;
        };
        let prefix = criteria[start..start + len].trim();
        if !prefix.is_empty() {
            prefixes.push(prefix.to_string());
        }
        cursor = start + len + 1;
    }
    prefixes
}

fn effective_count(count: usize) -> usize {
    if count == 0 { usize::MAX } else { count }
}

/// Service ContentDirectory adossé à une médiathèque
pub struct ContentDirectory {
    library: Arc<dyn MediaLibrary>,
    settings: Arc<CatalogSettings>,
}

impl ContentDirectory {
    pub fn new(library: Arc<dyn MediaLibrary>, settings: impl Into<Arc<CatalogSettings>>) -> Self {
        Self {
            library,
            settings: settings.into(),
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Racine fraîche pour `user`
    pub fn root(&self, user: &User) -> Node {
        Node::root(self.library.clone(), user.clone())
    }

    /// Résout un identifiant depuis une racine fraîche
    ///
    /// Les identifiants fixes sont résolus sans parcours (certains clients
    /// interrogent `13` ou `15` directement) ; les autres par recherche
    /// récursive depuis la racine.
    pub fn resolve(&self, id: &str, user: &User) -> Option<Node> {
        let root = self.root(user);
        let node = match WellKnown::from_id(id) {
            Some(WellKnown::Root) => Some(root),
            Some(wk) => Some(Node::detached(root.context().clone(), wk)),
            None => root.get_child_recursive(id),
        };
        debug!(id = %id, found = node.is_some(), "ContentDirectory::resolve");
        node
    }

    /// Enfants directs paginés, filtrés par le premier préfixe de classe
    ///
    /// `count == 0` retourne tous les enfants à partir de `start`.
    pub fn list_children<S: AsRef<str>>(
        &self,
        node: &Node,
        start: usize,
        count: usize,
        class_prefixes: &[S],
    ) -> Vec<Node> {
        node.get_children_filtered(class_prefixes, start, effective_count(count))
    }

    /// Descendants filtrés par classe, avec la pagination récursive approximative
    ///
    /// `count == 0` retourne tous les descendants correspondants.
    pub fn search<S: AsRef<str>>(
        &self,
        node: &Node,
        class_prefixes: &[S],
        start: usize,
        count: usize,
    ) -> Vec<Node> {
        node.get_children_recursive_filtered(class_prefixes, start, effective_count(count))
    }

    /// Projette un nœud pour un client et un jeu de préfixes donnés
    pub fn project(
        &self,
        node: &Node,
        signature: DeviceSignature,
        url_prefixes: &[String],
    ) -> MediaObject {
        Projector::new(&self.settings, signature, url_prefixes).project(node)
    }

    /// Action Browse ; un identifiant inconnu donne une réponse vide
    pub fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse> {
        debug!(
            object_id = %request.object_id,
            browse_flag = %request.browse_flag,
            starting_index = %request.starting_index,
            requested_count = %request.requested_count,
            signature = %request.signature,
            "ContentDirectory::Browse"
        );

        let Some(node) = self.resolve(&request.object_id, &request.user) else {
            debug!(object_id = %request.object_id, "Object not found");
            return BrowseResponse::from_objects(Vec::new(), 0);
        };
        let projector = Projector::new(&self.settings, request.signature, &self.settings.url_prefixes);

        match request.browse_flag {
            BrowseFlag::Metadata => BrowseResponse::from_objects(vec![projector.project(&node)], 1),
            BrowseFlag::DirectChildren => {
                let total = node.child_count();
                let no_filter: &[&str] = &[];
                let objects = self
                    .list_children(
                        &node,
                        request.starting_index as usize,
                        request.requested_count as usize,
                        no_filter,
                    )
                    .iter()
                    .map(|child| projector.project(child))
                    .collect();
                BrowseResponse::from_objects(objects, total)
            }
        }
    }

    /// Action Search (critères `derivedfrom` uniquement, `*` pour tout)
    pub fn search_request(&self, request: &SearchRequest) -> Result<BrowseResponse> {
        debug!(
            container_id = %request.container_id,
            criteria = %request.search_criteria,
            starting_index = %request.starting_index,
            requested_count = %request.requested_count,
            "ContentDirectory::Search"
        );

        let Some(node) = self.resolve(&request.container_id, &request.user) else {
            return BrowseResponse::from_objects(Vec::new(), 0);
        };
        let prefixes = parse_derived_from(&request.search_criteria);
        let projector = Projector::new(&self.settings, request.signature, &self.settings.url_prefixes);

        let (page, total) = node.get_children_recursive_with_total(
            &prefixes,
            request.starting_index as usize,
            effective_count(request.requested_count as usize),
        );
        let objects = page.iter().map(|n| projector.project(n)).collect();
        BrowseResponse::from_objects(objects, total)
    }
}
