//! Types MIME et chaînes `protocolInfo`

use crate::device::DeviceSignature;
use pmodidl::ProtocolInfo;

/// Drapeaux annoncés pour les ressources servies en flux HTTP
pub const DEFAULT_FLAGS: &str = "DLNA.ORG_FLAGS=01500000000000000000000000000000";

/// Type MIME d'après l'extension du fichier (avec ou sans point)
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_lowercase();
    match ext.as_str() {
        "mkv" => "video/x-matroska",
        "mp4" | "m4v" => "video/mp4",
        "mpeg" | "mpg" => "video/mpeg",
        "avi" => "video/avi",
        "asf" => "video/x-ms-asf",
        "wmv" => "video/x-ms-wmv",
        "m2ts" | "ts" => "video/mp2t",
        "ogv" => "video/ogg",
        "webm" => "video/webm",
        "flv" => "video/x-flv",
        "3gp" => "video/3gpp",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wma" => "audio/x-ms-wma",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Profil DLNA (`DLNA.ORG_PN`) connu pour un type MIME
fn dlna_profile(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "audio/mpeg" => Some("MP3"),
        "audio/x-ms-wma" => Some("WMABASE"),
        "video/mpeg" => Some("MPEG_PS_PAL"),
        "video/x-ms-wmv" => Some("WMVHIGH_FULL"),
        "image/jpeg" => Some("JPEG_LRG"),
        "image/png" => Some("PNG_LRG"),
        _ => None,
    }
}

/// Type MIME tel que le client l'attend
///
/// La PS3 ne lit les AVI qu'annoncés en `video/divx`, la Xbox en `video/avi`.
pub fn mime_type_for_device(mime_type: &str, signature: DeviceSignature) -> String {
    let mime = mime_type.to_lowercase();
    match (mime.as_str(), signature) {
        ("video/avi" | "video/x-msvideo", DeviceSignature::Ps3) => "video/divx".to_string(),
        ("video/avi" | "video/x-msvideo", DeviceSignature::Xbox) => "video/avi".to_string(),
        _ => mime,
    }
}

/// `protocolInfo` d'une ressource servie en flux HTTP
///
/// ```
/// use pmocatalog::{protocol_info_for_mime, DeviceSignature};
///
/// let info = protocol_info_for_mime("audio/mpeg", DeviceSignature::Unknown);
/// assert_eq!(info.profile_name(), Some("MP3"));
/// assert_eq!(info.dlna_param("DLNA.ORG_OP"), Some("01"));
/// ```
pub fn protocol_info_for_mime(mime_type: &str, signature: DeviceSignature) -> ProtocolInfo {
    let mime = mime_type_for_device(mime_type, signature);
    let profile = dlna_profile(&mime)
        .map(|pn| format!("DLNA.ORG_PN={};", pn))
        .unwrap_or_default();
    ProtocolInfo::http_get(
        mime,
        format!("{}DLNA.ORG_OP=01;DLNA.ORG_CI=0;{}", profile, DEFAULT_FLAGS),
    )
}
