//! Signature du client qui émet la requête
//!
//! La projection adapte quelques détails (classe des épisodes, drapeaux DLNA,
//! type MIME des AVI) selon la famille de renderer.

use std::fmt;

/// Famille de client reconnue à partir de son `User-Agent`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceSignature {
    #[default]
    Unknown,
    /// Windows Media Player / Windows Media Center
    Wmp,
    Xbox,
    Ps3,
    Sonos,
}

impl DeviceSignature {
    /// Classe un client d'après son en-tête `User-Agent`
    ///
    /// La Xbox 360 s'annonce aussi comme Windows Media Player : elle est
    /// testée en premier.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if ua.contains("xbox") {
            DeviceSignature::Xbox
        } else if ua.contains("playstation 3") || ua.contains("ps3") {
            DeviceSignature::Ps3
        } else if ua.contains("windows-media-player")
            || ua.contains("wmfsdk")
            || ua.contains("nsplayer")
        {
            DeviceSignature::Wmp
        } else if ua.contains("sonos") {
            DeviceSignature::Sonos
        } else {
            DeviceSignature::Unknown
        }
    }

    /// Client de type magnétoscope numérique (épisodes en `videoBroadcast`)
    pub fn is_dvr(self) -> bool {
        self == DeviceSignature::Wmp
    }
}

impl fmt::Display for DeviceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceSignature::Unknown => "unknown",
            DeviceSignature::Wmp => "wmp",
            DeviceSignature::Xbox => "xbox",
            DeviceSignature::Ps3 => "ps3",
            DeviceSignature::Sonos => "sonos",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user_agent() {
        assert_eq!(
            DeviceSignature::from_user_agent("Windows-Media-Player/12.0.7601.17514"),
            DeviceSignature::Wmp
        );
        assert_eq!(
            DeviceSignature::from_user_agent("Xbox/2.0.4548.0 UPnP/1.0 Xbox/2.0.4548.0"),
            DeviceSignature::Xbox
        );
        assert_eq!(
            DeviceSignature::from_user_agent("PLAYSTATION 3"),
            DeviceSignature::Ps3
        );
        assert_eq!(
            DeviceSignature::from_user_agent("Linux UPnP/1.0 Sonos/29.3-87071 (ZPS1)"),
            DeviceSignature::Sonos
        );
        assert_eq!(DeviceSignature::from_user_agent(""), DeviceSignature::Unknown);
    }

    #[test]
    fn test_only_wmp_is_dvr() {
        assert!(DeviceSignature::Wmp.is_dvr());
        assert!(!DeviceSignature::Xbox.is_dvr());
    }
}
