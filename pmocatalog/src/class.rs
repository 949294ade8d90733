//! Classes UPnP (`upnp:class`) utilisées par le catalogue

pub const CONTAINER: &str = "object.container";
pub const STORAGE_FOLDER: &str = "object.container.storageFolder";
pub const VIDEO_ALBUM: &str = "object.container.album.videoAlbum";
pub const MUSIC_ALBUM: &str = "object.container.album.musicAlbum";
pub const MUSIC_ARTIST: &str = "object.container.person.musicArtist";
pub const MUSIC_GENRE: &str = "object.container.genre.musicGenre";
pub const VIDEO_GENRE: &str = "object.container.genre.videoGenre";

pub const ITEM: &str = "object.item";
pub const VIDEO_ITEM: &str = "object.item.videoItem";
pub const VIDEO_BROADCAST: &str = "object.item.videoItem.videoBroadcast";
pub const AUDIO_ITEM: &str = "object.item.audioItem";
pub const MUSIC_TRACK: &str = "object.item.audioItem.musicTrack";

/// `starts_with` sans tenir compte de la casse
pub fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Égalité sans tenir compte de la casse
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
