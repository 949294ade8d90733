//! Réglages immuables de la projection
//!
//! [`CatalogSettings`] est construit une fois (depuis la configuration ou en
//! code) puis partagé en lecture seule par toutes les requêtes. Un
//! rechargement de configuration produit une nouvelle valeur.

use crate::device::DeviceSignature;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use url::Url;

/// Extensions pour lesquelles un flux statique peut être proposé
pub const STATIC_STREAM_EXTENSIONS: [&str; 11] = [
    ".mkv", ".mpeg", ".avi", ".asf", ".wmv", ".mp4", ".m2ts", ".ts", ".ogv", ".m4v", ".webm",
];

/// Liste d'extensions séparées par des virgules (`.mkv,.mp4`) ou joker `*`
///
/// La comparaison ignore la casse ; le point initial est ajouté s'il manque.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionList {
    wildcard: bool,
    entries: Vec<String>,
}

impl ExtensionList {
    pub fn parse(csv: &str) -> Self {
        let mut list = Self::default();
        for entry in csv.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if entry == "*" {
                list.wildcard = true;
            } else {
                list.entries.push(normalize_extension(entry));
            }
        }
        list
    }

    /// Liste qui accepte toutes les extensions
    pub fn any() -> Self {
        Self {
            wildcard: true,
            entries: Vec::new(),
        }
    }

    pub fn contains(&self, extension: &str) -> bool {
        if self.wildcard {
            return true;
        }
        let extension = normalize_extension(extension.trim());
        self.entries.iter().any(|e| *e == extension)
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_empty(&self) -> bool {
        !self.wildcard && self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let csv: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(&csv.join(","))
    }
}

impl fmt::Display for ExtensionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        if self.wildcard {
            parts.insert(0, "*");
        }
        f.write_str(&parts.join(","))
    }
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Profil de vignette
///
/// L'image est demandée en `max_width`×`max_height` mais annoncée avec
/// `report_resolution` : certains renderers n'acceptent que 160x160.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailProfile {
    pub mime_type: String,
    pub protocol_info: String,
    pub max_width: u32,
    pub max_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_resolution: Option<String>,
}

impl ThumbnailProfile {
    pub fn png_tn() -> Self {
        Self {
            mime_type: "image/png".to_string(),
            protocol_info: "http-get:*:image/png:DLNA.ORG_PN=PNG_TN;DLNA.ORG_OP=00;DLNA.ORG_CI=1"
                .to_string(),
            max_width: 800,
            max_height: 800,
            report_resolution: Some("160x160".to_string()),
        }
    }

    pub fn jpeg_tn() -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            protocol_info: "http-get:*:image/jpeg:DLNA.ORG_PN=JPEG_TN;DLNA.ORG_OP=00;DLNA.ORG_CI=1"
                .to_string(),
            max_width: 800,
            max_height: 800,
            report_resolution: Some("160x160".to_string()),
        }
    }

    /// Paramètres de taille ajoutés à l'URI de l'image
    pub fn query(&self) -> String {
        format!("?MaxHeight={}&MaxWidth={}", self.max_height, self.max_width)
    }
}

/// Ressource vidéo entièrement décrite par l'opérateur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomVideoResource {
    pub extensions: ExtensionList,
    /// Gabarit d'URI (`{0}`/`{prefix}`, `{1}`/`{id}`)
    pub uri_template: String,
    pub protocol_info: String,
}

impl CustomVideoResource {
    /// `None` dès qu'une des trois valeurs est vide
    pub fn from_parts(extensions: &str, uri_template: &str, protocol_info: &str) -> Option<Self> {
        if extensions.trim().is_empty()
            || uri_template.trim().is_empty()
            || protocol_info.trim().is_empty()
        {
            return None;
        }
        Some(Self {
            extensions: ExtensionList::parse(extensions),
            uri_template: uri_template.trim().to_string(),
            protocol_info: protocol_info.trim().to_string(),
        })
    }
}

// ============= Profils de transcodage intégrés =============

pub const TRANSCODE_MAX_WIDTH: u32 = 1920;
pub const TRANSCODE_MAX_HEIGHT: u32 = 1080;
pub const TRANSCODE_VIDEO_BITRATE: u32 = 5_000_000;
pub const TRANSCODE_AUDIO_BITRATE: u32 = 128_000;
pub const TRANSCODE_AUDIO_CHANNELS: u32 = 2;

const STREAMING_FLAGS: &str = "DLNA.ORG_FLAGS=01500000000000000000000000000000";

/// Cible de transcodage proposée à tous les clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeProfile {
    pub extension: &'static str,
    pub mime_type: &'static str,
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
    dlna_profile: Option<&'static str>,
    conversion_indicator: u8,
    xbox_conversion_indicator: u8,
}

/// Cibles intégrées, dans l'ordre d'émission
pub const TRANSCODE_PROFILES: [TranscodeProfile; 5] = [
    // La Xbox écarte les flux mp4 marqués comme convertis
    TranscodeProfile {
        extension: ".mp4",
        mime_type: "video/mp4",
        video_codec: "h264",
        audio_codec: "mp3",
        dlna_profile: None,
        conversion_indicator: 1,
        xbox_conversion_indicator: 0,
    },
    TranscodeProfile {
        extension: ".asf",
        mime_type: "video/x-ms-asf",
        video_codec: "h264",
        audio_codec: "aac",
        dlna_profile: None,
        conversion_indicator: 1,
        xbox_conversion_indicator: 1,
    },
    TranscodeProfile {
        extension: ".wmv",
        mime_type: "video/x-ms-wmv",
        video_codec: "wmv",
        audio_codec: "wma",
        dlna_profile: Some("WMVHIGH_BASE"),
        conversion_indicator: 0,
        xbox_conversion_indicator: 0,
    },
    TranscodeProfile {
        extension: ".webm",
        mime_type: "video/webm",
        video_codec: "vpx",
        audio_codec: "vorbis",
        dlna_profile: None,
        conversion_indicator: 1,
        xbox_conversion_indicator: 1,
    },
    TranscodeProfile {
        extension: ".mkv",
        mime_type: "video/x-matroska",
        video_codec: "vpx",
        audio_codec: "vorbis",
        dlna_profile: None,
        conversion_indicator: 1,
        xbox_conversion_indicator: 1,
    },
];

impl TranscodeProfile {
    /// Chaîne `protocolInfo` annoncée à `signature`
    pub fn protocol_info(&self, signature: DeviceSignature) -> String {
        let ci = if signature == DeviceSignature::Xbox {
            self.xbox_conversion_indicator
        } else {
            self.conversion_indicator
        };
        let profile = self
            .dlna_profile
            .map(|pn| format!("DLNA.ORG_PN={};", pn))
            .unwrap_or_default();
        format!(
            "http-get:*:{}:{}DLNA.ORG_OP=01;DLNA.ORG_CI={};{}",
            self.mime_type, profile, ci, STREAMING_FLAGS
        )
    }

    /// Paramètres de transcodage passés dans l'URI du flux
    pub fn query(&self) -> String {
        format!(
            "?audioChannels={}&audioBitrate={}&videoBitrate={}&maxWidth={}&maxHeight={}&videoCodec={}&audioCodec={}",
            TRANSCODE_AUDIO_CHANNELS,
            TRANSCODE_AUDIO_BITRATE,
            TRANSCODE_VIDEO_BITRATE,
            TRANSCODE_MAX_WIDTH,
            TRANSCODE_MAX_HEIGHT,
            self.video_codec,
            self.audio_codec
        )
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", TRANSCODE_MAX_WIDTH, TRANSCODE_MAX_HEIGHT)
    }
}

// ============= Réglages =============

pub const DEFAULT_AUDIO_URI_TEMPLATE: &str = "{0}Audio/{1}/stream.mp3";
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Réglages partagés par la projection et les résolveurs de ressources
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// Préfixes d'URL, chacun terminé par `/`
    pub url_prefixes: Vec<String>,
    pub static_extensions: ExtensionList,
    pub transcode_extensions: ExtensionList,
    pub custom_video: Option<CustomVideoResource>,
    pub audio_uri_template: String,
    pub audio_mime_type: String,
    pub thumbnail_profiles: Vec<ThumbnailProfile>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            url_prefixes: Vec::new(),
            static_extensions: STATIC_STREAM_EXTENSIONS.iter().collect(),
            transcode_extensions: TRANSCODE_PROFILES.iter().map(|p| p.extension).collect(),
            custom_video: None,
            audio_uri_template: DEFAULT_AUDIO_URI_TEMPLATE.to_string(),
            audio_mime_type: DEFAULT_AUDIO_MIME_TYPE.to_string(),
            thumbnail_profiles: vec![ThumbnailProfile::png_tn(), ThumbnailProfile::jpeg_tn()],
        }
    }
}

impl CatalogSettings {
    /// Remplace les préfixes d'URL
    ///
    /// Les préfixes qui ne sont pas des URL absolues sont ignorés avec un
    /// avertissement ; un `/` final est ajouté si nécessaire.
    pub fn with_url_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.url_prefixes = normalize_prefixes(prefixes);
        self
    }

    pub fn with_static_extensions(mut self, csv: &str) -> Self {
        self.static_extensions = ExtensionList::parse(csv);
        self
    }

    pub fn with_transcode_extensions(mut self, csv: &str) -> Self {
        self.transcode_extensions = ExtensionList::parse(csv);
        self
    }

    pub fn with_custom_video(mut self, custom: Option<CustomVideoResource>) -> Self {
        self.custom_video = custom;
        self
    }

    pub fn with_audio(mut self, uri_template: &str, mime_type: &str) -> Self {
        self.audio_uri_template = uri_template.to_string();
        self.audio_mime_type = mime_type.to_string();
        self
    }

    pub fn with_thumbnail_profiles(mut self, profiles: Vec<ThumbnailProfile>) -> Self {
        self.thumbnail_profiles = profiles;
        self
    }
}

/// Valide les préfixes et leur ajoute un `/` final
pub fn normalize_prefixes<I, S>(prefixes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    prefixes
        .into_iter()
        .filter_map(|prefix| {
            let prefix = prefix.as_ref().trim();
            if prefix.is_empty() {
                return None;
            }
            match Url::parse(prefix) {
                Ok(url) if !url.cannot_be_a_base() => {
                    if prefix.ends_with('/') {
                        Some(prefix.to_string())
                    } else {
                        Some(format!("{}/", prefix))
                    }
                }
                Ok(_) => {
                    warn!(prefix = %prefix, "URL prefix cannot be used as a base, ignored");
                    None
                }
                Err(e) => {
                    warn!(prefix = %prefix, error = %e, "Invalid URL prefix, ignored");
                    None
                }
            }
        })
        .collect()
}
