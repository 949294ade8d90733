//! Nœuds de l'arborescence ContentDirectory
//!
//! Un [`Node`] est une vue éphémère d'une entrée de l'arbre : conteneur fixe,
//! conteneur dynamique ou feuille jouable. Les enfants ne sont jamais stockés.
//! Chaque appel à [`Node::children`] interroge à nouveau la médiathèque, si
//! bien que l'arbre reflète toujours l'état courant de celle-ci. Les nœuds
//! sont construits pour une requête puis abandonnés.
//!
//! # Pagination récursive
//!
//! [`Node::get_children_recursive`] ne parcourt tout le sous-arbre que si les
//! enfants directs ne suffisent pas à remplir la page demandée. Au-delà du
//! premier niveau, la pagination n'est donc stable qu'approximativement : si
//! la médiathèque change entre deux évaluations, une page peut décaler. Ce
//! compromis est assumé.

use crate::class::{self, eq_ignore_case, starts_with_ignore_case};
use crate::containers;
use crate::library::{MediaEntity, MediaLibrary, User};
use crate::registry::WellKnown;
use std::fmt;
use std::sync::{Arc, Weak};

/// Séquence paresseuse de nœuds
///
/// Rien n'est calculé avant le premier `next()`.
pub type NodeIter = Box<dyn Iterator<Item = Node> + Send>;

/// Conteneurs dont les enfants sont calculés à partir d'une entité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicKind {
    MusicGenre,
    MusicArtist,
    MusicAlbum,
    VideoGenre,
    Actor,
    Series,
    Season,
    Folder,
}

impl DynamicKind {
    pub const fn class(self) -> &'static str {
        match self {
            DynamicKind::MusicGenre => class::MUSIC_GENRE,
            DynamicKind::MusicArtist => class::MUSIC_ARTIST,
            DynamicKind::MusicAlbum => class::MUSIC_ALBUM,
            DynamicKind::VideoGenre => class::VIDEO_GENRE,
            DynamicKind::Actor => class::VIDEO_ALBUM,
            DynamicKind::Series => class::VIDEO_ALBUM,
            DynamicKind::Season => class::VIDEO_ALBUM,
            DynamicKind::Folder => class::STORAGE_FOLDER,
        }
    }
}

/// Entrées jouables, sans enfants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Video,
    Music,
}

impl LeafKind {
    pub const fn class(self) -> &'static str {
        match self {
            LeafKind::Video => class::VIDEO_ITEM,
            LeafKind::Music => class::MUSIC_TRACK,
        }
    }
}

/// Variante d'un nœud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    WellKnown(WellKnown),
    Dynamic(DynamicKind),
    Leaf(LeafKind),
}

impl NodeKind {
    pub const fn class(self) -> &'static str {
        match self {
            NodeKind::WellKnown(_) => class::CONTAINER,
            NodeKind::Dynamic(kind) => kind.class(),
            NodeKind::Leaf(kind) => kind.class(),
        }
    }
}

/// Médiathèque et utilisateur partagés par tous les nœuds d'une requête
pub(crate) struct CatalogContext {
    pub(crate) library: Arc<dyn MediaLibrary>,
    pub(crate) user: User,
}

struct NodeInner {
    id: String,
    parent_id: String,
    parent: Weak<NodeInner>,
    kind: NodeKind,
    entity: Arc<MediaEntity>,
    ctx: Arc<CatalogContext>,
}

/// Entrée de l'arborescence
///
/// Cloner un `Node` ne copie que le pointeur partagé.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    /// Construit une racine fraîche (`0`) pour `user`
    pub fn root(library: Arc<dyn MediaLibrary>, user: User) -> Node {
        let ctx = Arc::new(CatalogContext { library, user });
        Self::detached(ctx, WellKnown::Root)
    }

    /// Conteneur fixe construit sans parcourir l'arbre depuis la racine
    ///
    /// Son `parent_id` est celui du registre, mais [`Node::parent`] retourne
    /// `None` : aucun ancêtre n'est instancié.
    pub(crate) fn detached(ctx: Arc<CatalogContext>, wk: WellKnown) -> Node {
        let entity = ctx.library.root_folder(&ctx.user);
        Node {
            inner: Arc::new(NodeInner {
                id: wk.id().to_string(),
                parent_id: wk.parent().map(|p| p.id().to_string()).unwrap_or_default(),
                parent: Weak::new(),
                kind: NodeKind::WellKnown(wk),
                entity,
                ctx,
            }),
        }
    }

    /// Conteneur fixe enfant de `self`
    pub(crate) fn well_known_child(&self, wk: WellKnown) -> Node {
        Node {
            inner: Arc::new(NodeInner {
                id: wk.id().to_string(),
                parent_id: self.inner.id.clone(),
                parent: Arc::downgrade(&self.inner),
                kind: NodeKind::WellKnown(wk),
                entity: self.inner.entity.clone(),
                ctx: self.inner.ctx.clone(),
            }),
        }
    }

    /// Nœud enfant adossé à une entité de la médiathèque
    pub(crate) fn entity_child(&self, kind: NodeKind, entity: Arc<MediaEntity>) -> Node {
        Node {
            inner: Arc::new(NodeInner {
                id: entity.id.clone(),
                parent_id: self.inner.id.clone(),
                parent: Arc::downgrade(&self.inner),
                kind,
                entity,
                ctx: self.inner.ctx.clone(),
            }),
        }
    }

    pub(crate) fn context(&self) -> &Arc<CatalogContext> {
        &self.inner.ctx
    }

    // ============= Accesseurs =============

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Identifiant du parent, vide pour la racine
    pub fn parent_id(&self) -> &str {
        &self.inner.parent_id
    }

    pub fn kind(&self) -> NodeKind {
        self.inner.kind
    }

    /// Classe UPnP (`upnp:class`)
    pub fn class(&self) -> &'static str {
        self.inner.kind.class()
    }

    /// Entité de la médiathèque sur laquelle repose le nœud
    ///
    /// Les conteneurs fixes reposent sur le dossier racine de l'utilisateur.
    pub fn entity(&self) -> &Arc<MediaEntity> {
        &self.inner.entity
    }

    pub fn well_known(&self) -> Option<WellKnown> {
        match self.inner.kind {
            NodeKind::WellKnown(wk) => Some(wk),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self.inner.kind, NodeKind::Leaf(_))
    }

    /// Titre brut : titre du registre pour les conteneurs fixes, nom de
    /// l'entité sinon
    pub fn title(&self) -> &str {
        match self.inner.kind {
            NodeKind::WellKnown(wk) => wk.title(),
            _ => &self.inner.entity.name,
        }
    }

    pub fn user(&self) -> &User {
        &self.inner.ctx.user
    }

    pub(crate) fn library(&self) -> &dyn MediaLibrary {
        self.inner.ctx.library.as_ref()
    }

    /// Parent, tant qu'il est encore détenu ailleurs
    pub fn parent(&self) -> Option<Node> {
        self.inner.parent.upgrade().map(|inner| Node { inner })
    }

    /// Identifiants depuis le plus ancien ancêtre encore vivant jusqu'à ce nœud
    pub fn path(&self) -> Vec<String> {
        let mut path = vec![self.inner.id.clone()];
        let mut current = self.parent();
        while let Some(node) = current {
            path.push(node.inner.id.clone());
            current = node.parent();
        }
        path.reverse();
        path
    }

    // ============= Navigation =============

    /// Enfants directs, recalculés à chaque appel
    pub fn children(&self) -> NodeIter {
        let node = self.clone();
        Box::new(std::iter::once_with(move || containers::children_of(&node)).flatten())
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    /// Tranche `[start, start + count)` des enfants directs
    pub fn get_children(&self, start: usize, count: usize) -> Vec<Node> {
        self.children().skip(start).take(count).collect()
    }

    /// Tranche des enfants dont la classe commence par le premier préfixe
    ///
    /// Seul le premier préfixe est pris en compte, sans tenir compte de la
    /// casse. Une liste vide ne filtre rien.
    pub fn get_children_filtered<S: AsRef<str>>(
        &self,
        class_prefixes: &[S],
        start: usize,
        count: usize,
    ) -> Vec<Node> {
        let matches = class_filter(class_prefixes);
        self.children()
            .filter(|n| matches(n))
            .skip(start)
            .take(count)
            .collect()
    }

    /// Enfants directs puis, pour chaque enfant, ses propres descendants
    ///
    /// Pas de déduplication ni d'ordre global ; chaque appel recalcule tout.
    pub fn recursive_children(&self) -> NodeIter {
        let node = self.clone();
        Box::new(
            self.children().chain(
                std::iter::once_with(move || node.children())
                    .flatten()
                    .flat_map(|child| child.recursive_children()),
            ),
        )
    }

    /// Pagination récursive approximative (voir la documentation du module)
    pub fn get_children_recursive(&self, start: usize, count: usize) -> Vec<Node> {
        let end = start.saturating_add(count);
        if self.children().take(end).count() >= end {
            return self.get_children(start, count);
        }
        self.recursive_children().skip(start).take(count).collect()
    }

    /// Pagination récursive approximative après filtrage par classe
    pub fn get_children_recursive_filtered<S: AsRef<str>>(
        &self,
        class_prefixes: &[S],
        start: usize,
        count: usize,
    ) -> Vec<Node> {
        let matches = class_filter(class_prefixes);
        let end = start.saturating_add(count);
        if self.children().filter(|n| matches(n)).take(end).count() >= end {
            return self.get_children_filtered(class_prefixes, start, count);
        }
        self.recursive_children()
            .filter(|n| matches(n))
            .skip(start)
            .take(count)
            .collect()
    }

    /// Page récursive filtrée et nombre total de descendants correspondants
    ///
    /// Même page que [`Node::get_children_recursive_filtered`], mais les
    /// descendants ne sont parcourus qu'une fois pour la page et le total.
    pub fn get_children_recursive_with_total<S: AsRef<str>>(
        &self,
        class_prefixes: &[S],
        start: usize,
        count: usize,
    ) -> (Vec<Node>, usize) {
        let matches = class_filter(class_prefixes);
        let children: Vec<Node> = self.children().collect();
        let direct: Vec<Node> = children.iter().filter(|n| matches(n)).cloned().collect();
        let descendants: Vec<Node> = children
            .iter()
            .cloned()
            .chain(children.iter().flat_map(|child| child.recursive_children()))
            .filter(|n| matches(n))
            .collect();
        let total = descendants.len();

        let end = start.saturating_add(count);
        let source = if direct.len() >= end { direct } else { descendants };
        let page = source.into_iter().skip(start).take(count).collect();
        (page, total)
    }

    /// Recherche d'un descendant par identifiant, sans tenir compte de la casse
    ///
    /// Les enfants directs sont examinés avant le parcours complet.
    pub fn get_child_recursive(&self, id: &str) -> Option<Node> {
        self.children()
            .find(|n| eq_ignore_case(n.id(), id))
            .or_else(|| self.recursive_children().find(|n| eq_ignore_case(n.id(), id)))
    }

    /// La classe contient-elle `class_fragment` (test de sous-chaîne)
    pub fn is_derived_from(&self, class_fragment: &str) -> bool {
        self.class().contains(class_fragment)
    }
}

fn class_filter<S: AsRef<str>>(class_prefixes: &[S]) -> impl Fn(&Node) -> bool + use<S> {
    let prefix = class_prefixes.first().map(|p| p.as_ref().to_string());
    move |node: &Node| match &prefix {
        Some(prefix) => starts_with_ignore_case(node.class(), prefix),
        None => true,
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id)
            .field("parent_id", &self.inner.parent_id)
            .field("kind", &self.inner.kind)
            .field("entity", &self.inner.entity.id)
            .finish()
    }
}

impl PartialEq for Node {
    /// Deux nœuds sont égaux s'ils désignent la même entrée (identifiant,
    /// variante et entité)
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
            && self.inner.kind == other.inner.kind
            && self.inner.entity.id == other.inner.entity.id
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{EntityKind, MediaEntity};
    use crate::memory::MemoryLibrary;

    fn library() -> Arc<MemoryLibrary> {
        let library = MemoryLibrary::new("Media");
        for (id, name) in [("t1", "Track B"), ("t2", "Track A"), ("t3", "Track C")] {
            library
                .insert(None, MediaEntity::new(id, EntityKind::Audio, name))
                .unwrap();
        }
        Arc::new(library)
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id()).collect()
    }

    #[test]
    fn test_root_children() {
        let root = Node::root(library(), User::default());
        assert_eq!(root.id(), "0");
        assert_eq!(root.parent_id(), "");
        assert_eq!(ids(&root.get_children(0, 10)), vec!["1", "2", "12"]);
    }

    #[test]
    fn test_children_paging_concatenates() {
        let root = Node::root(library(), User::default());
        let all: Vec<Node> = root.children().collect();
        let mut paged = root.get_children(0, 1);
        paged.extend(root.get_children(1, all.len() - 1));
        assert_eq!(paged, all);
    }

    #[test]
    fn test_recursive_children_lists_children_before_grandchildren() {
        let root = Node::root(library(), User::default());
        let first: Vec<String> = root
            .recursive_children()
            .take(7)
            .map(|n| n.id().to_string())
            .collect();
        assert_eq!(first, vec!["1", "2", "12", "4", "5", "6", "7"]);
    }

    #[test]
    fn test_recursive_paging_cheap_path() {
        let root = Node::root(library(), User::default());
        // 3 enfants directs suffisent pour [1, 3)
        assert_eq!(ids(&root.get_children_recursive(1, 2)), vec!["2", "12"]);
        // au-delà, le sous-arbre complet est parcouru
        assert_eq!(ids(&root.get_children_recursive(3, 2)), vec!["4", "5"]);
    }

    #[test]
    fn test_recursive_page_with_total() {
        let root = Node::root(library(), User::default());
        let prefixes = ["object.item.audioItem"];

        let (page, total) = root.get_children_recursive_with_total(&prefixes, 1, 5);
        assert_eq!(page, root.get_children_recursive_filtered(&prefixes, 1, 5));
        assert_eq!(page.len(), 2);
        assert_eq!(
            total,
            root.recursive_children()
                .filter(|n| n.is_derived_from("audioItem"))
                .count()
        );
        assert_eq!(total, 3);

        // chemin court : la page vient des enfants directs
        let all_music = root.get_child_recursive("4").unwrap();
        let (page, total) = all_music.get_children_recursive_with_total(&prefixes, 0, 2);
        assert_eq!(ids(&page), ids(&all_music.get_children(0, 2)));
        assert_eq!(total, 3);
    }

    #[test]
    fn test_filter_uses_first_prefix_only() {
        let music = Node::root(library(), User::default())
            .get_child_recursive("4")
            .unwrap();
        let tracks = music.get_children_filtered(&["OBJECT.ITEM.AUDIOITEM", "object.container"], 0, 10);
        assert_eq!(tracks.len(), 3);

        let none = music.get_children_filtered(&["object.container", "object.item"], 0, 10);
        assert!(none.is_empty());
    }

    #[test]
    fn test_get_child_recursive_and_parent_link() {
        let root = Node::root(library(), User::default());
        let all_music = root.get_child_recursive("4").unwrap();
        assert_eq!(all_music.parent_id(), "1");
        assert_eq!(all_music.title(), "All Music");

        let series = root.get_child_recursive("e").unwrap();
        assert_eq!(series.id(), "E");

        let track = root.get_child_recursive("T2").unwrap();
        assert_eq!(track.id(), "t2");
        assert_eq!(track.parent_id(), "4");

        assert!(root.get_child_recursive("missing").is_none());
    }

    #[test]
    fn test_path_follows_live_ancestors() {
        let root = Node::root(library(), User::default());
        let music = root.get_children(0, 1).remove(0);
        let all_music = music.get_children(0, 1).remove(0);
        let track = all_music.get_children(0, 1).remove(0);

        assert_eq!(track.path(), vec!["0", "1", "4", "t1"]);
        assert_eq!(track.parent().unwrap().id(), "4");

        drop(music);
        drop(root);
        // le parent direct est encore détenu, les ancêtres plus lointains non
        assert_eq!(track.path(), vec!["4", "t1"]);
    }

    #[test]
    fn test_is_derived_from_is_substring() {
        let root = Node::root(library(), User::default());
        let track = root.get_child_recursive("t1").unwrap();
        assert!(track.is_derived_from("audioItem"));
        assert!(!track.is_derived_from("AUDIOITEM"));
        assert!(root.is_derived_from("container"));
    }
}
