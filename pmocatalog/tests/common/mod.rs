//! Médiathèque de test partagée par les tests d'intégration
#![allow(dead_code)]

use chrono::NaiveDate;
use pmocatalog::{
    CatalogError, CatalogSettings, EntityKind, ImageKind, MediaEntity, MediaLibrary,
    MediaStreamInfo, MemoryLibrary, Node, PersonInfo, Result, User,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const PREFIX: &str = "http://192.168.1.10:8096/mediabrowser/";

pub fn settings() -> CatalogSettings {
    CatalogSettings::default().with_url_prefixes([PREFIX])
}

fn track(id: &str, name: &str, index: u32, artist: &str, album: &str, genres: &[&str]) -> MediaEntity {
    MediaEntity::new(id, EntityKind::Audio, name)
        .with_index_number(index)
        .with_album(artist, artist, album)
        .with_genres(genres.iter().copied())
        .with_run_time(Duration::from_secs(180))
}

/// Construit la médiathèque de référence
///
/// ```text
/// Media
/// ├── Music (Folder)
/// │   ├── Zappa (MusicArtist) / Apostrophe (MusicAlbum) / t1, t2
/// │   └── ABBA (MusicArtist) / Arrival (MusicAlbum) / t3
/// ├── Films (Folder)
/// │   ├── m1 Alien
/// │   ├── m2 Airplane!
/// │   └── Comedies (Folder) / m3 Hot Shots
/// └── Friends (Series)
///     ├── Season 1 / e2, e1
///     └── Season 2 / e3
/// ```
pub fn library() -> Arc<MemoryLibrary> {
    let library = MemoryLibrary::new("Media");
    populate(&library).unwrap();
    Arc::new(library)
}

fn populate(library: &MemoryLibrary) -> Result<()> {
    library.insert(None, MediaEntity::new("f_music", EntityKind::Folder, "Music"))?;
    library.insert(
        Some("f_music"),
        MediaEntity::new("ar1", EntityKind::MusicArtist, "Zappa"),
    )?;
    library.insert(
        Some("ar1"),
        MediaEntity::new("al1", EntityKind::MusicAlbum, "Apostrophe")
            .with_image(ImageKind::Primary, "/covers/apostrophe.jpg"),
    )?;
    library.insert(
        Some("al1"),
        track("t1", "Cosmik Debris", 2, "Zappa", "Apostrophe", &["Rock"])
            .with_person(PersonInfo::new("Frank Zappa", "Composer"))
            .with_production_year(1974),
    )?;
    library.insert(
        Some("al1"),
        track("t2", "Apostrophe'", 1, "Zappa", "Apostrophe", &["rock", "Jazz"]),
    )?;
    library.insert(
        Some("f_music"),
        MediaEntity::new("ar2", EntityKind::MusicArtist, "ABBA"),
    )?;
    library.insert(
        Some("ar2"),
        MediaEntity::new("al2", EntityKind::MusicAlbum, "Arrival"),
    )?;
    library.insert(
        Some("al2"),
        track("t3", "Dancing Queen", 1, "ABBA", "Arrival", &["Pop"]),
    )?;

    library.insert(None, MediaEntity::new("f_video", EntityKind::Folder, "Films"))?;
    library.insert(
        Some("f_video"),
        MediaEntity::new("m1", EntityKind::Movie, "Alien")
            .with_genres(["Sci-Fi", "Horror"])
            .with_person(PersonInfo::actor("Sigourney Weaver", "Ripley"))
            .with_person(PersonInfo::new("Ridley Scott", "Director"))
            .with_premiere_date(NaiveDate::from_ymd_opt(1979, 5, 25).unwrap_or_default())
            .with_overview("In space no one can hear you scream.")
            .with_image(ImageKind::Primary, "/img/alien.jpg")
            .with_path("/media/films/alien.mkv")
            .with_video_stream(MediaStreamInfo {
                bitrate: Some(8_000_000),
                channels: Some(6),
                sample_rate: Some(48_000),
            })
            .with_run_time(Duration::from_secs(7020)),
    )?;
    library.insert(
        Some("f_video"),
        MediaEntity::new("m2", EntityKind::Movie, "Airplane!")
            .with_genres(["comedy"])
            .with_person(PersonInfo::actor("Leslie Nielsen", "Dr. Rumack")),
    )?;
    library.insert(
        Some("f_video"),
        MediaEntity::new("f_sub", EntityKind::Folder, "Comedies"),
    )?;
    library.insert(
        Some("f_sub"),
        MediaEntity::new("m3", EntityKind::Movie, "Hot Shots")
            .with_genres(["Comedy"])
            .with_person(PersonInfo::actor("Charlie Sheen", "Topper"))
            .with_person(PersonInfo::actor("leslie nielsen", "Cameo")),
    )?;

    library.insert(None, MediaEntity::new("s1", EntityKind::Series, "Friends"))?;
    library.insert(
        Some("s1"),
        MediaEntity::new("se1", EntityKind::Season, "Season 1").with_overview("First season"),
    )?;
    library.insert(
        Some("se1"),
        MediaEntity::new("e2", EntityKind::Episode, "The One with the Sonogram")
            .with_index_number(2)
            .with_series("Friends", Some("Season 1"))
            .with_genres(["Comedy"]),
    )?;
    library.insert(
        Some("se1"),
        MediaEntity::new("e1", EntityKind::Episode, "The One Where It All Began")
            .with_index_number(1)
            .with_series("Friends", Some("Season 1")),
    )?;
    library.insert(
        Some("s1"),
        MediaEntity::new("se2", EntityKind::Season, "Season 2"),
    )?;
    library.insert(
        Some("se2"),
        MediaEntity::new("e3", EntityKind::Episode, "The One with Ross's New Girlfriend")
            .with_index_number(1)
            .with_series("Friends", Some("Season 2")),
    )?;

    library.register_person(
        MediaEntity::new("p_weaver", EntityKind::Person, "Sigourney Weaver")
            .with_overview("American actress")
            .with_image(ImageKind::Primary, "/people/weaver.jpg"),
    );
    Ok(())
}

/// Identifiants audio de la médiathèque de référence
pub const AUDIO_IDS: [&str; 3] = ["t1", "t2", "t3"];

/// Identifiants vidéo de la médiathèque de référence
pub const VIDEO_IDS: [&str; 6] = ["m1", "m2", "m3", "e2", "e1", "e3"];

pub fn root(library: Arc<MemoryLibrary>) -> Node {
    Node::root(library, User::default())
}

pub fn ids(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id().to_string()).collect()
}

/// Enfant direct portant `name` (sans casse)
pub fn child_named(node: &Node, name: &str) -> Option<Node> {
    node.children()
        .find(|n| n.entity().name.eq_ignore_ascii_case(name) && n.well_known().is_none())
}

/// Médiathèque dont la résolution de certains genres échoue
pub struct FlakyLibrary {
    pub inner: Arc<MemoryLibrary>,
    pub failing_genre: &'static str,
}

impl MediaLibrary for FlakyLibrary {
    fn root_folder(&self, user: &User) -> Arc<MediaEntity> {
        self.inner.root_folder(user)
    }

    fn children(&self, parent: &MediaEntity, user: &User) -> Vec<Arc<MediaEntity>> {
        self.inner.children(parent, user)
    }

    fn genre(&self, name: &str) -> Result<Arc<MediaEntity>> {
        if name.eq_ignore_ascii_case(self.failing_genre) {
            return Err(CatalogError::Library(format!("genre {} unavailable", name)));
        }
        self.inner.genre(name)
    }

    fn person(&self, name: &str) -> Result<Arc<MediaEntity>> {
        self.inner.person(name)
    }
}

/// Compte les appels à `children` faits sur la médiathèque
pub struct CountingLibrary {
    pub inner: Arc<MemoryLibrary>,
    pub calls: AtomicUsize,
}

impl CountingLibrary {
    pub fn new(inner: Arc<MemoryLibrary>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Nombre d'appels depuis le dernier relevé
    pub fn take_calls(&self) -> usize {
        self.calls.swap(0, Ordering::SeqCst)
    }
}

impl MediaLibrary for CountingLibrary {
    fn root_folder(&self, user: &User) -> Arc<MediaEntity> {
        self.inner.root_folder(user)
    }

    fn children(&self, parent: &MediaEntity, user: &User) -> Vec<Arc<MediaEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.children(parent, user)
    }

    fn genre(&self, name: &str) -> Result<Arc<MediaEntity>> {
        self.inner.genre(name)
    }

    fn person(&self, name: &str) -> Result<Arc<MediaEntity>> {
        self.inner.person(name)
    }
}
