//! # pmodidl - DIDL-Lite
//!
//! Modèle et sérialisation du format DIDL-Lite utilisé dans UPnP/DLNA.
//!
//! Les descripteurs produits par le catalogue ([`Container`], [`Item`]) sont
//! sérialisés avec `quick-xml`.

use serde::Serialize;
use std::time::Duration;

mod protocol_info;

pub use protocol_info::ProtocolInfo;

pub const DIDL_NAMESPACE: &str = "urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/";
pub const UPNP_NAMESPACE: &str = "urn:schemas-upnp-org:metadata-1-0/upnp/";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const DLNA_NAMESPACE: &str = "urn:schemas-dlna-org:metadata-1-0/";

/// Erreurs du module DIDL-Lite
#[derive(Debug, thiserror::Error)]
pub enum DidlError {
    #[error("Failed to serialize DIDL-Lite: {0}")]
    Serialize(#[from] quick_xml::se::SeError),
}

pub type Result<T> = std::result::Result<T, DidlError>;

// ============= Structures DIDL-Lite =============

/// Racine d'un document DIDL-Lite
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "DIDL-Lite")]
pub struct DIDLLite {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,

    #[serde(rename = "@xmlns:upnp", skip_serializing_if = "Option::is_none")]
    pub xmlns_upnp: Option<String>,

    #[serde(rename = "@xmlns:dc", skip_serializing_if = "Option::is_none")]
    pub xmlns_dc: Option<String>,

    #[serde(rename = "@xmlns:dlna", skip_serializing_if = "Option::is_none")]
    pub xmlns_dlna: Option<String>,

    #[serde(rename = "container")]
    pub containers: Vec<Container>,

    #[serde(rename = "item")]
    pub items: Vec<Item>,
}

/// Entrée de crédit (`upnp:actor`, `upnp:author`, `upnp:artist`)
///
/// Le rôle est porté par l'attribut `role`, le nom par le texte de l'élément.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonRole {
    #[serde(rename = "@role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(rename = "$text")]
    pub name: String,
}

impl PersonRole {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            name: name.into(),
        }
    }

    /// Entrée sans attribut `role`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            role: None,
            name: name.into(),
        }
    }
}

/// URI de pochette (`upnp:albumArtURI`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumArt {
    #[serde(rename = "@dlna:profileID", skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,

    #[serde(rename = "$text")]
    pub uri: String,
}

/// Container pouvant contenir d'autres containers ou items
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@parentID")]
    pub parent_id: String,

    #[serde(rename = "@restricted", skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,

    #[serde(rename = "@childCount", skip_serializing_if = "Option::is_none")]
    pub child_count: Option<String>,

    #[serde(rename = "dc:title")]
    pub title: String,

    #[serde(rename = "upnp:class")]
    pub class: String,

    #[serde(rename = "dc:creator", skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(rename = "dc:date", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "dc:language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "dc:description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "upnp:longDescription", skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    #[serde(rename = "upnp:rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    #[serde(rename = "upnp:genre", skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(rename = "upnp:actor", skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<PersonRole>,

    #[serde(rename = "upnp:author", skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PersonRole>,

    #[serde(rename = "upnp:artist", skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<PersonRole>,

    #[serde(rename = "upnp:director", skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    #[serde(rename = "upnp:seriesTitle", skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,

    #[serde(rename = "upnp:albumArtURI", skip_serializing_if = "Vec::is_empty")]
    pub album_art: Vec<AlbumArt>,

    #[serde(rename = "upnp:icon", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(rename = "res", skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

/// Item : objet terminal (piste audio, vidéo, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Item {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@parentID")]
    pub parent_id: String,

    #[serde(rename = "@restricted", skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,

    #[serde(rename = "dc:title")]
    pub title: String,

    #[serde(rename = "dc:creator", skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(rename = "upnp:class")]
    pub class: String,

    #[serde(rename = "dc:date", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "dc:language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "dc:description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "upnp:longDescription", skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    #[serde(rename = "upnp:rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    #[serde(rename = "upnp:genre", skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(rename = "upnp:actor", skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<PersonRole>,

    #[serde(rename = "upnp:author", skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PersonRole>,

    #[serde(rename = "upnp:artist", skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<PersonRole>,

    #[serde(rename = "upnp:director", skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    #[serde(rename = "dc:contributor", skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,

    #[serde(rename = "upnp:album", skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    #[serde(rename = "upnp:seriesTitle", skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,

    #[serde(rename = "upnp:programTitle", skip_serializing_if = "Option::is_none")]
    pub program_title: Option<String>,

    #[serde(rename = "upnp:episodeNumber", skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<String>,

    #[serde(rename = "upnp:originalTrackNumber", skip_serializing_if = "Option::is_none")]
    pub original_track_number: Option<String>,

    #[serde(rename = "upnp:albumArtURI", skip_serializing_if = "Vec::is_empty")]
    pub album_art: Vec<AlbumArt>,

    #[serde(rename = "upnp:icon", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(rename = "res")]
    pub resources: Vec<Resource>,
}

/// Ressource média (flux lisible ou image)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "@protocolInfo")]
    pub protocol_info: String,

    #[serde(rename = "@size", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(rename = "@bitrate", skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,

    #[serde(rename = "@sampleFrequency", skip_serializing_if = "Option::is_none")]
    pub sample_frequency: Option<String>,

    #[serde(rename = "@nrAudioChannels", skip_serializing_if = "Option::is_none")]
    pub nr_audio_channels: Option<String>,

    #[serde(rename = "@resolution", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    #[serde(rename = "$text")]
    pub url: String,
}

/// Descripteur d'un objet du ContentDirectory : container ou item
#[derive(Debug, Clone, PartialEq)]
pub enum MediaObject {
    Container(Container),
    Item(Item),
}

impl MediaObject {
    pub fn resources(&self) -> &[Resource] {
        match self {
            MediaObject::Container(c) => &c.resources,
            MediaObject::Item(i) => &i.resources,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            MediaObject::Container(c) => Some(c),
            MediaObject::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            MediaObject::Item(i) => Some(i),
            MediaObject::Container(_) => None,
        }
    }
}

impl From<Container> for MediaObject {
    fn from(container: Container) -> Self {
        MediaObject::Container(container)
    }
}

impl From<Item> for MediaObject {
    fn from(item: Item) -> Self {
        MediaObject::Item(item)
    }
}

// ============= Implémentation des méthodes =============

impl DIDLLite {
    /// Crée un document avec les namespaces DIDL-Lite, UPnP, DC et DLNA
    pub fn new(containers: Vec<Container>, items: Vec<Item>) -> Self {
        Self {
            xmlns: DIDL_NAMESPACE.to_string(),
            xmlns_upnp: Some(UPNP_NAMESPACE.to_string()),
            xmlns_dc: Some(DC_NAMESPACE.to_string()),
            xmlns_dlna: Some(DLNA_NAMESPACE.to_string()),
            containers,
            items,
        }
    }

    /// Construit un document à partir d'une liste de descripteurs
    ///
    /// L'ordre relatif des containers d'une part et des items d'autre part
    /// est conservé.
    pub fn from_objects(objects: impl IntoIterator<Item = MediaObject>) -> Self {
        let mut containers = Vec::new();
        let mut items = Vec::new();
        for object in objects {
            match object {
                MediaObject::Container(c) => containers.push(c),
                MediaObject::Item(i) => items.push(i),
            }
        }
        Self::new(containers, items)
    }

    /// Sérialise le document (sans déclaration XML)
    pub fn to_xml(&self) -> Result<String> {
        Ok(quick_xml::se::to_string(self)?)
    }

    /// Nombre d'objets de premier niveau
    pub fn len(&self) -> usize {
        self.containers.len() + self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }
}

impl Item {
    /// Itère sur les ressources vidéo uniquement
    pub fn video_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(|r| r.protocol_info.contains(":video/"))
    }

    /// Itère sur les ressources audio uniquement
    pub fn audio_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(|r| r.protocol_info.contains(":audio/"))
    }

    /// Itère sur les vignettes (ressources image)
    pub fn image_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(|r| r.protocol_info.contains(":image/"))
    }
}

/// Formate une durée au format DLNA `HH:MM:SS[.mmm]`
///
/// Les millisecondes ne sont écrites que si elles sont non nulles.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    let millis = duration.subsec_millis();
    if millis == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }
}
