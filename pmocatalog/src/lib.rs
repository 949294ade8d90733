//! # pmocatalog - Arbre ContentDirectory DLNA/UPnP
//!
//! Cette crate expose une médiathèque sous la forme de l'arbre navigable
//! attendu par les renderers DLNA : conteneurs fixes (Musique, Vidéo,
//! Listes de lecture...), conteneurs dynamiques (genres, artistes, albums,
//! acteurs, séries, saisons, dossiers) et feuilles (pistes, vidéos).
//!
//! ## Fonctionnalités
//!
//! - Nœuds construits à la demande, enfants évalués paresseusement
//! - Registre des identifiants fixes (`0`, `1`, `2`... `16`)
//! - Agrégation parallèle des genres, artistes et acteurs
//! - Projection en DIDL-Lite avec ressources jouables, vignettes et icône
//! - Adaptation aux particularités des clients (Xbox, PS3, WMP, Sonos)
//! - Façade [`ContentDirectory`] : Browse et Search
//!
//! ## Architecture
//!
//! La médiathèque est un collaborateur externe décrit par le trait
//! [`MediaLibrary`] ; [`MemoryLibrary`] en fournit une implémentation en
//! mémoire. Les réglages ([`CatalogSettings`]) sont un instantané immuable,
//! lu depuis `pmoconfig` via [`CatalogConfigExt`] ou construit directement.
//!
//! ## Utilisation
//!
//! ```rust
//! use pmocatalog::{
//!     BrowseFlag, BrowseRequest, CatalogSettings, ContentDirectory, EntityKind, MediaEntity,
//!     MemoryLibrary,
//! };
//! use std::sync::Arc;
//!
//! let library = Arc::new(MemoryLibrary::new("Media"));
//! library
//!     .insert(None, MediaEntity::new("m1", EntityKind::Movie, "Alien").with_genres(["Sci-Fi"]))
//!     .unwrap();
//!
//! let settings = CatalogSettings::default().with_url_prefixes(["http://192.168.1.10:8096/mediabrowser/"]);
//! let directory = ContentDirectory::new(library, settings);
//!
//! let response = directory
//!     .browse(&BrowseRequest::new("0", BrowseFlag::DirectChildren))
//!     .unwrap();
//! assert_eq!(response.total_matches, 3);
//! ```

pub mod artwork;
pub mod browse;
pub mod class;
mod containers;
pub mod device;
pub mod dlna;
pub mod error;
pub mod library;
pub mod memory;
pub mod node;
pub mod projection;
pub mod registry;
pub mod resources;
pub mod settings;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use artwork::{ArtworkResolver, ImageScope, ICON_PRIORITY};
pub use browse::{
    parse_derived_from, BrowseFlag, BrowseRequest, BrowseResponse, ContentDirectory,
    SearchRequest,
};
pub use device::DeviceSignature;
pub use dlna::{mime_type_for_device, mime_type_for_extension, protocol_info_for_mime};
pub use error::{CatalogError, Result};
pub use library::{
    person_type, EntityId, EntityKind, ImageKind, MediaEntity, MediaLibrary, MediaStreamInfo,
    PersonInfo, User,
};
pub use memory::MemoryLibrary;
pub use node::{DynamicKind, LeafKind, Node, NodeIter, NodeKind};
pub use projection::Projector;
pub use registry::WellKnown;
pub use resources::{expand_template, ResourceResolver};
pub use settings::{
    normalize_prefixes, CatalogSettings, CustomVideoResource, ExtensionList, ThumbnailProfile,
    TranscodeProfile, STATIC_STREAM_EXTENSIONS, TRANSCODE_PROFILES,
};

#[cfg(feature = "pmoconfig")]
pub use config_ext::CatalogConfigExt;
