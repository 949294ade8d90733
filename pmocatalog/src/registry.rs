//! Conteneurs à identifiant fixe
//!
//! Le haut de l'arbre est figé : ses identifiants font partie du contrat
//! avec les clients (certains interrogent directement `13` ou `15` sans
//! passer par la racine). Ils ne doivent jamais changer.

use std::fmt;

/// Conteneur à identifiant fixe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    Root,
    Music,
    Video,
    Playlists,
    AllMusic,
    MusicGenre,
    MusicArtist,
    MusicAlbum,
    AllVideo,
    VideoGenre,
    Actors,
    Series,
    VideoFolders,
    AllPlaylists,
    PlaylistFolders,
}

impl WellKnown {
    /// Tous les conteneurs fixes, parcours en profondeur depuis la racine
    pub const ALL: [WellKnown; 15] = [
        WellKnown::Root,
        WellKnown::Music,
        WellKnown::AllMusic,
        WellKnown::MusicGenre,
        WellKnown::MusicArtist,
        WellKnown::MusicAlbum,
        WellKnown::Video,
        WellKnown::AllVideo,
        WellKnown::VideoGenre,
        WellKnown::Actors,
        WellKnown::Series,
        WellKnown::VideoFolders,
        WellKnown::Playlists,
        WellKnown::AllPlaylists,
        WellKnown::PlaylistFolders,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            WellKnown::Root => "0",
            WellKnown::Music => "1",
            WellKnown::Video => "2",
            WellKnown::Playlists => "12",
            WellKnown::AllMusic => "4",
            WellKnown::MusicGenre => "5",
            WellKnown::MusicArtist => "6",
            WellKnown::MusicAlbum => "7",
            WellKnown::AllVideo => "8",
            WellKnown::VideoGenre => "9",
            WellKnown::Actors => "A",
            WellKnown::Series => "E",
            WellKnown::VideoFolders => "15",
            WellKnown::AllPlaylists => "13",
            WellKnown::PlaylistFolders => "17",
        }
    }

    /// Titre affiché par les clients
    pub const fn title(self) -> &'static str {
        match self {
            WellKnown::Root => "Root",
            WellKnown::Music => "Music",
            WellKnown::Video => "Video",
            WellKnown::Playlists => "Playlists",
            WellKnown::AllMusic => "All Music",
            WellKnown::MusicGenre => "Genre",
            WellKnown::MusicArtist => "Artist",
            WellKnown::MusicAlbum => "Album",
            WellKnown::AllVideo => "All Video",
            WellKnown::VideoGenre => "Genre",
            WellKnown::Actors => "Actors",
            WellKnown::Series => "Series",
            WellKnown::VideoFolders => "Folders",
            WellKnown::AllPlaylists => "AllPlaylists",
            WellKnown::PlaylistFolders => "PlaylistsFolders",
        }
    }

    pub const fn parent(self) -> Option<WellKnown> {
        match self {
            WellKnown::Root => None,
            WellKnown::Music | WellKnown::Video | WellKnown::Playlists => Some(WellKnown::Root),
            WellKnown::AllMusic
            | WellKnown::MusicGenre
            | WellKnown::MusicArtist
            | WellKnown::MusicAlbum => Some(WellKnown::Music),
            WellKnown::AllVideo
            | WellKnown::VideoGenre
            | WellKnown::Actors
            | WellKnown::Series
            | WellKnown::VideoFolders => Some(WellKnown::Video),
            WellKnown::AllPlaylists | WellKnown::PlaylistFolders => Some(WellKnown::Playlists),
        }
    }

    /// Sous-conteneurs fixes, dans l'ordre de présentation
    pub const fn children(self) -> &'static [WellKnown] {
        match self {
            WellKnown::Root => &[WellKnown::Music, WellKnown::Video, WellKnown::Playlists],
            WellKnown::Music => &[
                WellKnown::AllMusic,
                WellKnown::MusicGenre,
                WellKnown::MusicArtist,
                WellKnown::MusicAlbum,
            ],
            WellKnown::Video => &[
                WellKnown::AllVideo,
                WellKnown::VideoGenre,
                WellKnown::Actors,
                WellKnown::Series,
                WellKnown::VideoFolders,
            ],
            WellKnown::Playlists => &[WellKnown::AllPlaylists, WellKnown::PlaylistFolders],
            _ => &[],
        }
    }

    /// Recherche par identifiant, sans tenir compte de la casse (`a` == `A`)
    pub fn from_id(id: &str) -> Option<WellKnown> {
        Self::ALL
            .into_iter()
            .find(|wk| wk.id().eq_ignore_ascii_case(id))
    }

    /// Chaîne des ancêtres, de la racine jusqu'au parent direct
    pub fn ancestors(self) -> Vec<WellKnown> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(wk) = current {
            chain.push(wk);
            current = wk.parent();
        }
        chain.reverse();
        chain
    }
}

impl fmt::Display for WellKnown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_the_wire_contract() {
        let expected = [
            (WellKnown::Root, "0"),
            (WellKnown::Music, "1"),
            (WellKnown::Video, "2"),
            (WellKnown::Playlists, "12"),
            (WellKnown::AllMusic, "4"),
            (WellKnown::MusicGenre, "5"),
            (WellKnown::MusicArtist, "6"),
            (WellKnown::MusicAlbum, "7"),
            (WellKnown::AllVideo, "8"),
            (WellKnown::VideoGenre, "9"),
            (WellKnown::Actors, "A"),
            (WellKnown::Series, "E"),
            (WellKnown::VideoFolders, "15"),
            (WellKnown::AllPlaylists, "13"),
            (WellKnown::PlaylistFolders, "17"),
        ];
        for (wk, id) in expected {
            assert_eq!(wk.id(), id);
            assert_eq!(WellKnown::from_id(id), Some(wk));
        }
        let unique: HashSet<_> = WellKnown::ALL.iter().map(|wk| wk.id()).collect();
        assert_eq!(unique.len(), WellKnown::ALL.len());
    }

    #[test]
    fn test_parent_and_children_agree() {
        for wk in WellKnown::ALL {
            for child in wk.children() {
                assert_eq!(child.parent(), Some(wk));
            }
            if let Some(parent) = wk.parent() {
                assert!(parent.children().contains(&wk));
            }
        }
    }

    #[test]
    fn test_from_id_ignores_case_and_rejects_unknown() {
        assert_eq!(WellKnown::from_id("e"), Some(WellKnown::Series));
        assert_eq!(WellKnown::from_id("3"), None);
        assert_eq!(WellKnown::from_id(""), None);
    }

    #[test]
    fn test_ancestors() {
        assert_eq!(
            WellKnown::VideoFolders.ancestors(),
            vec![WellKnown::Root, WellKnown::Video]
        );
        assert!(WellKnown::Root.ancestors().is_empty());
    }
}
