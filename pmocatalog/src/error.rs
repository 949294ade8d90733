//! Types d'erreurs pour pmocatalog

/// Erreurs du catalogue
///
/// Le parcours de l'arbre et la projection n'échouent jamais : une
/// métadonnée absente donne une valeur vide, une variante de ressource
/// impossible est omise. Seuls la façade `browse`, la résolution des entités
/// partagées et le chargement des réglages remontent des erreurs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid BrowseFlag: {0}")]
    InvalidBrowseFlag(String),

    #[error("DIDL-Lite serialization failed: {0}")]
    Serialization(#[from] pmodidl::DidlError),

    #[error("Library error: {0}")]
    Library(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

/// Type Result spécialisé pour pmocatalog
pub type Result<T> = std::result::Result<T, CatalogError>;
