//! `protocolInfo` DLNA : `<protocol>:<network>:<contentFormat>:<additionalInfo>`

use std::fmt;

/// Chaîne `protocolInfo` décomposée
///
/// ```
/// use pmodidl::ProtocolInfo;
///
/// let info = ProtocolInfo::http_get("video/mp4", "DLNA.ORG_OP=01;DLNA.ORG_CI=1");
/// assert_eq!(info.to_string(), "http-get:*:video/mp4:DLNA.ORG_OP=01;DLNA.ORG_CI=1");
/// assert_eq!(info.dlna_param("DLNA.ORG_CI"), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolInfo {
    pub protocol: String,
    pub network: String,
    pub content_format: String,
    pub additional_info: String,
}

impl ProtocolInfo {
    /// `http-get:*:{mime}:{additional_info}`
    pub fn http_get(mime: impl Into<String>, additional_info: impl Into<String>) -> Self {
        Self {
            protocol: "http-get".to_string(),
            network: "*".to_string(),
            content_format: mime.into(),
            additional_info: additional_info.into(),
        }
    }

    /// Valeur d'un paramètre `NOM=valeur` du quatrième champ
    pub fn dlna_param(&self, name: &str) -> Option<&str> {
        self.additional_info.split(';').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    /// Profil DLNA (`DLNA.ORG_PN`) s'il est présent
    pub fn profile_name(&self) -> Option<&str> {
        self.dlna_param("DLNA.ORG_PN")
    }
}

impl fmt::Display for ProtocolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.protocol, self.network, self.content_format, self.additional_info
        )
    }
}
