//! Ressources jouables (`<res>`) des feuilles vidéo et audio
//!
//! Une vidéo cumule trois sources indépendantes, dans cet ordre : le flux
//! statique du fichier d'origine, les cibles de transcodage intégrées et une
//! ressource personnalisée décrite par l'opérateur. Une variante impossible
//! (fichier absent, extension refusée, réglage vide) est simplement omise.

use crate::device::DeviceSignature;
use crate::dlna::{mime_type_for_extension, protocol_info_for_mime};
use crate::library::MediaEntity;
use crate::settings::{
    CatalogSettings, TRANSCODE_AUDIO_CHANNELS, TRANSCODE_PROFILES, TRANSCODE_VIDEO_BITRATE,
    STATIC_STREAM_EXTENSIONS,
};
use pmodidl::{Resource, format_duration};
use tracing::{trace, warn};
use url::Url;

/// Substitue `{0}`/`{prefix}` et `{1}`/`{id}` dans un gabarit d'URI
pub fn expand_template(template: &str, prefix: &str, id: &str) -> String {
    template
        .replace("{0}", prefix)
        .replace("{prefix}", prefix)
        .replace("{1}", id)
        .replace("{id}", id)
}

/// Normalise une URI absolue ; `None` (avec un avertissement) si elle est invalide
pub(crate) fn normalize_uri(raw: &str) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(uri = %raw, error = %e, "Invalid resource URI, resource skipped");
            None
        }
    }
}

/// Ressource de base : seule la durée est renseignée
fn base_resource(entity: &MediaEntity) -> Resource {
    Resource {
        duration: entity.run_time.map(format_duration),
        ..Default::default()
    }
}

/// Construit les ressources jouables pour un client donné
pub struct ResourceResolver<'a> {
    settings: &'a CatalogSettings,
    signature: DeviceSignature,
    prefixes: &'a [String],
}

impl<'a> ResourceResolver<'a> {
    pub fn new(
        settings: &'a CatalogSettings,
        signature: DeviceSignature,
        prefixes: &'a [String],
    ) -> Self {
        Self {
            settings,
            signature,
            prefixes,
        }
    }

    /// Statique, puis transcodages, puis ressource personnalisée
    pub fn video_resources(&self, entity: &MediaEntity) -> Vec<Resource> {
        let mut resources = self.static_resources(entity);
        resources.extend(self.transcode_resources(entity));
        resources.extend(self.custom_resources(entity));
        resources
    }

    /// Flux du fichier d'origine, sans conversion
    ///
    /// Exige un flux vidéo connu, un fichier présent sur le disque et une
    /// extension acceptée à la fois par la liste intégrée et par la
    /// configuration.
    pub fn static_resources(&self, entity: &MediaEntity) -> Vec<Resource> {
        let Some(stream) = entity.default_video_stream else {
            trace!(id = %entity.id, "No default video stream, static resource omitted");
            return Vec::new();
        };
        let Some(path) = entity.path.as_ref() else {
            return Vec::new();
        };
        let Some(extension) = entity.extension() else {
            return Vec::new();
        };

        let builtin = STATIC_STREAM_EXTENSIONS
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&extension));
        if !builtin || !self.settings.static_extensions.contains(&extension) {
            trace!(id = %entity.id, extension = %extension, "Extension not served statically");
            return Vec::new();
        }

        let size = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                trace!(id = %entity.id, path = %path.display(), "Source file missing, static resource omitted");
                return Vec::new();
            }
        };

        let protocol_info =
            protocol_info_for_mime(mime_type_for_extension(&extension), self.signature).to_string();

        self.prefixes
            .iter()
            .filter_map(|prefix| {
                let url = normalize_uri(&format!(
                    "{}Videos/{}/stream{}?static=true",
                    prefix, entity.id, extension
                ))?;
                Some(Resource {
                    protocol_info: protocol_info.clone(),
                    size: Some(size.to_string()),
                    bitrate: stream.bitrate.map(|v| v.to_string()),
                    nr_audio_channels: stream.channels.map(|v| v.to_string()),
                    sample_frequency: stream.sample_rate.map(|v| v.to_string()),
                    url,
                    ..base_resource(entity)
                })
            })
            .collect()
    }

    /// Cibles de transcodage intégrées autorisées par la configuration
    pub fn transcode_resources(&self, entity: &MediaEntity) -> Vec<Resource> {
        let mut resources = Vec::new();
        for prefix in self.prefixes {
            for profile in TRANSCODE_PROFILES
                .iter()
                .filter(|p| self.settings.transcode_extensions.contains(p.extension))
            {
                let Some(url) = normalize_uri(&format!(
                    "{}Videos/{}/stream{}{}",
                    prefix,
                    entity.id,
                    profile.extension,
                    profile.query()
                )) else {
                    continue;
                };
                resources.push(Resource {
                    protocol_info: profile.protocol_info(self.signature),
                    bitrate: Some(TRANSCODE_VIDEO_BITRATE.to_string()),
                    nr_audio_channels: Some(TRANSCODE_AUDIO_CHANNELS.to_string()),
                    resolution: Some(profile.resolution()),
                    url,
                    ..base_resource(entity)
                });
            }
        }
        resources
    }

    /// Ressource personnalisée : au plus une, sur le premier préfixe valide
    pub fn custom_resources(&self, entity: &MediaEntity) -> Vec<Resource> {
        let Some(custom) = self.settings.custom_video.as_ref() else {
            return Vec::new();
        };
        if entity.default_video_stream.is_none() {
            return Vec::new();
        }
        let extension = entity.extension().unwrap_or_default();
        if !custom.extensions.is_wildcard() && !custom.extensions.contains(&extension) {
            trace!(id = %entity.id, extension = %extension, "Extension not served by custom resource");
            return Vec::new();
        }

        self.prefixes
            .iter()
            .find_map(|prefix| {
                normalize_uri(&expand_template(&custom.uri_template, prefix, &entity.id))
            })
            .map(|url| Resource {
                protocol_info: custom.protocol_info.clone(),
                url,
                ..base_resource(entity)
            })
            .into_iter()
            .collect()
    }

    /// Un flux audio par préfixe, au format configuré
    pub fn audio_resources(&self, entity: &MediaEntity) -> Vec<Resource> {
        let protocol_info =
            protocol_info_for_mime(&self.settings.audio_mime_type, self.signature).to_string();

        self.prefixes
            .iter()
            .filter_map(|prefix| {
                let url = normalize_uri(&expand_template(
                    &self.settings.audio_uri_template,
                    prefix,
                    &entity.id,
                ))?;
                Some(Resource {
                    protocol_info: protocol_info.clone(),
                    url,
                    ..base_resource(entity)
                })
            })
            .collect()
    }
}
