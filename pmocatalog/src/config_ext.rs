//! Extension pour lire les réglages du catalogue depuis pmoconfig
//!
//! Ce module fournit le trait `CatalogConfigExt` qui construit un instantané
//! immuable [`CatalogSettings`] à partir de la section `dlna` de la
//! configuration.

use crate::settings::{
    normalize_prefixes, CatalogSettings, CustomVideoResource, ExtensionList, ThumbnailProfile,
    DEFAULT_AUDIO_MIME_TYPE, DEFAULT_AUDIO_URI_TEMPLATE,
};
use crate::{CatalogError, Result};
use pmoconfig::Config;
use serde_yaml::Value;
use tracing::{debug, warn};

const DEFAULT_URL_PATH: &str = "mediabrowser";

/// Trait d'extension pour lire la section `dlna` de pmoconfig
///
/// # Exemple
///
/// ```no_run
/// use pmoconfig::get_config;
/// use pmocatalog::CatalogConfigExt;
///
/// let config = get_config();
/// let settings = config.get_catalog_settings()?;
/// println!("{} URL prefixes", settings.url_prefixes.len());
/// # Ok::<(), pmocatalog::CatalogError>(())
/// ```
pub trait CatalogConfigExt {
    /// Chemin HTTP sous lequel flux et images sont servis (default: "mediabrowser")
    fn get_url_path(&self) -> Result<String>;

    /// Préfixes d'URL effectifs
    ///
    /// Les préfixes explicites de `dlna.url_prefixes` sont validés ; une liste
    /// vide est dérivée de `host.base_url` si elle est renseignée, sinon de
    /// chaque adresse IPv4 locale.
    fn get_url_prefixes(&self) -> Result<Vec<String>>;

    /// Remplace les préfixes explicites
    fn set_url_prefixes(&self, prefixes: Vec<String>) -> Result<()>;

    /// Profils de vignettes, dans l'ordre de la configuration
    fn get_thumbnail_profiles(&self) -> Result<Vec<ThumbnailProfile>>;

    /// Ressource vidéo personnalisée, `None` si l'un des trois champs est vide
    fn get_custom_video_resource(&self) -> Result<Option<CustomVideoResource>>;

    /// Construit l'instantané complet des réglages
    fn get_catalog_settings(&self) -> Result<CatalogSettings>;

    /// Directive `tracing` tirée de `host.logger`
    ///
    /// `None` si la sortie console est désactivée, sinon le niveau minimum en
    /// minuscules, directement utilisable par `EnvFilter`.
    fn get_log_directive(&self) -> Result<Option<String>>;
}

fn string_or(config: &Config, path: &[&str], default: &str) -> Result<String> {
    Ok(config
        .get_string(path)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string()))
}

fn derived_prefixes(config: &Config, url_path: &str) -> Vec<String> {
    let port = config.get_http_port();
    if config.has_base_url() {
        let base = config.get_base_url();
        let prefix = if base.contains("://") {
            let path = url_path.trim_matches('/');
            let base = base.trim_end_matches('/');
            if path.is_empty() {
                format!("{}/", base)
            } else {
                format!("{}/{}/", base, path)
            }
        } else {
            pmoutils::http_base_url(&base, port, url_path)
        };
        vec![prefix]
    } else {
        pmoutils::http_base_urls(port, url_path)
    }
}

impl CatalogConfigExt for Config {
    fn get_url_path(&self) -> Result<String> {
        string_or(self, &["dlna", "url_path"], DEFAULT_URL_PATH)
    }

    fn get_url_prefixes(&self) -> Result<Vec<String>> {
        let explicit = self.get_string_list(&["dlna", "url_prefixes"])?;
        let prefixes = if explicit.is_empty() {
            let derived = derived_prefixes(self, &self.get_url_path()?);
            debug!(prefixes = ?derived, "Derived URL prefixes from local addresses");
            normalize_prefixes(derived)
        } else {
            normalize_prefixes(explicit)
        };
        if prefixes.is_empty() {
            warn!("No usable URL prefix, resources and artwork will be empty");
        }
        Ok(prefixes)
    }

    fn set_url_prefixes(&self, prefixes: Vec<String>) -> Result<()> {
        let seq = prefixes.into_iter().map(Value::String).collect();
        self.set_value(&["dlna", "url_prefixes"], Value::Sequence(seq))?;
        Ok(())
    }

    fn get_thumbnail_profiles(&self) -> Result<Vec<ThumbnailProfile>> {
        match self.get_value(&["dlna", "thumbnails"]) {
            Ok(Value::Null) | Err(_) => Ok(CatalogSettings::default().thumbnail_profiles),
            Ok(value) => {
                serde_yaml::from_value(value).map_err(|e| CatalogError::InvalidSetting {
                    key: "dlna.thumbnails".to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn get_custom_video_resource(&self) -> Result<Option<CustomVideoResource>> {
        let extensions = self
            .get_string(&["dlna", "video", "custom", "extensions"])?
            .unwrap_or_default();
        let uri_template = self
            .get_string(&["dlna", "video", "custom", "uri_template"])?
            .unwrap_or_default();
        let protocol_info = self
            .get_string(&["dlna", "video", "custom", "protocol_info"])?
            .unwrap_or_default();
        Ok(CustomVideoResource::from_parts(
            &extensions,
            &uri_template,
            &protocol_info,
        ))
    }

    fn get_catalog_settings(&self) -> Result<CatalogSettings> {
        let defaults = CatalogSettings::default();

        let static_extensions = match self.get_string(&["dlna", "video", "static_extensions"])? {
            Some(csv) => ExtensionList::parse(&csv),
            None => defaults.static_extensions,
        };
        let transcode_extensions =
            match self.get_string(&["dlna", "video", "transcode_extensions"])? {
                Some(csv) => ExtensionList::parse(&csv),
                None => defaults.transcode_extensions,
            };

        let settings = CatalogSettings {
            url_prefixes: self.get_url_prefixes()?,
            static_extensions,
            transcode_extensions,
            custom_video: self.get_custom_video_resource()?,
            audio_uri_template: string_or(
                self,
                &["dlna", "audio", "uri_template"],
                DEFAULT_AUDIO_URI_TEMPLATE,
            )?,
            audio_mime_type: string_or(
                self,
                &["dlna", "audio", "mime_type"],
                DEFAULT_AUDIO_MIME_TYPE,
            )?,
            thumbnail_profiles: self.get_thumbnail_profiles()?,
        };

        debug!(
            prefixes = settings.url_prefixes.len(),
            static_extensions = %settings.static_extensions,
            transcode_extensions = %settings.transcode_extensions,
            custom = settings.custom_video.is_some(),
            "Catalog settings loaded"
        );
        Ok(settings)
    }

    fn get_log_directive(&self) -> Result<Option<String>> {
        if !self.get_log_enable_console()? {
            return Ok(None);
        }
        Ok(Some(self.get_log_min_level()?.to_lowercase()))
    }
}
