mod common;

use common::{child_named, library, root, settings, PREFIX};
use pmocatalog::{DeviceSignature, Node, Projector, WellKnown};
use pmodidl::{MediaObject, PersonRole};

fn find(root: &Node, parent: WellKnown, id: &str) -> Node {
    root.get_child_recursive(parent.id())
        .and_then(|p| p.children().find(|n| n.id() == id))
        .unwrap_or_else(|| panic!("{} not found under {}", id, parent))
}

fn project(node: &Node, signature: DeviceSignature) -> MediaObject {
    let settings = settings();
    let prefixes = settings.url_prefixes.clone();
    Projector::new(&settings, signature, &prefixes).project(node)
}

#[test]
fn test_root_container() {
    let root = root(library());
    let object = project(&root, DeviceSignature::Unknown);
    let container = object.as_container().expect("container");

    assert_eq!(container.id, "0");
    assert_eq!(container.parent_id, "");
    assert_eq!(container.title, "Root");
    assert_eq!(container.class, "object.container");
    assert_eq!(container.child_count.as_deref(), Some("3"));
    assert_eq!(container.restricted.as_deref(), Some("1"));
    assert_eq!(container.date, None);
    assert_eq!(container.rating, None);
}

#[test]
fn test_movie_item() {
    let root = root(library());
    let movie = find(&root, WellKnown::AllVideo, "m1");
    let object = project(&movie, DeviceSignature::Unknown);
    let item = object.as_item().expect("item");

    assert_eq!(item.parent_id, "8");
    assert_eq!(item.title, "Alien");
    assert_eq!(item.class, "object.item.videoItem");
    assert_eq!(item.date.as_deref(), Some("1979-05-25"));
    assert_eq!(item.description.as_deref(), Some("In space no one can hear you scream."));
    assert_eq!(item.genres, vec!["Sci-Fi", "Horror"]);
    assert_eq!(item.actors, vec![PersonRole::new("Sigourney Weaver", "Ripley")]);
    assert_eq!(item.authors, vec![PersonRole::new("Ridley Scott", "Director")]);
    assert_eq!(item.director.as_deref(), Some(" Ridley Scott"));
    assert_eq!(item.language, None);

    // Fichier absent : transcodages seulement, puis les deux vignettes
    assert_eq!(item.video_resources().count(), 5);
    assert_eq!(item.image_resources().count(), 2);
    assert_eq!(item.resources[0].duration.as_deref(), Some("01:57:00"));
    assert!(item.album_art.is_empty());
    assert_eq!(
        item.icon.as_deref(),
        Some(format!("{}Items/m1/Images/Primary?MaxHeight=120&MaxWidth=120", PREFIX).as_str())
    );
}

#[test]
fn test_episode_for_dvr_client() {
    let root = root(library());
    let episode = find(&root, WellKnown::AllVideo, "e2");

    let object = project(&episode, DeviceSignature::Wmp);
    let item = object.as_item().expect("item");
    assert_eq!(item.class, "object.item.videoItem.videoBroadcast");
    assert_eq!(item.episode_number.as_deref(), Some("2"));
    assert_eq!(item.series_title.as_deref(), Some("Friends"));
    assert_eq!(item.program_title.as_deref(), Some("The One with the Sonogram"));
    assert_eq!(item.title, "Friends-Season 1-The One with the Sonogram");

    let object = project(&episode, DeviceSignature::Sonos);
    let item = object.as_item().expect("item");
    assert_eq!(item.class, "object.item.videoItem");
    assert_eq!(item.episode_number, None);
    assert_eq!(item.title, "Friends-Season 1-The One with the Sonogram");
}

#[test]
fn test_music_track() {
    let root = root(library());
    let track = find(&root, WellKnown::AllMusic, "t1");
    let object = project(&track, DeviceSignature::Unknown);
    let item = object.as_item().expect("item");

    assert_eq!(item.class, "object.item.audioItem.musicTrack");
    assert_eq!(item.date.as_deref(), Some("1974"));
    assert_eq!(item.original_track_number.as_deref(), Some("2"));
    assert_eq!(item.album.as_deref(), Some("Apostrophe"));
    assert_eq!(item.contributor.as_deref(), Some("Zappa"));
    assert_eq!(item.creator.as_deref(), Some("Frank Zappa"));
    assert_eq!(
        item.artists,
        vec![
            PersonRole::named("Zappa"),
            PersonRole::new("Zappa", "MusicArtist"),
            PersonRole::new("Zappa", "artist"),
            PersonRole::new("Zappa", "Performer"),
        ]
    );

    assert_eq!(item.resources.len(), 1);
    assert_eq!(item.resources[0].url, format!("{}Audio/t1/stream.mp3", PREFIX));
    assert_eq!(item.resources[0].duration.as_deref(), Some("00:03:00"));
    assert!(item.resources[0].protocol_info.contains("DLNA.ORG_PN=MP3"));
    assert_eq!(item.icon, None);
}

#[test]
fn test_album_artwork() {
    let root = root(library());
    let album = root
        .get_child_recursive(WellKnown::MusicAlbum.id())
        .and_then(|albums| child_named(&albums, "Apostrophe"))
        .expect("album");
    let object = project(&album, DeviceSignature::Unknown);
    let container = object.as_container().expect("container");

    assert_eq!(container.class, "object.container.album.musicAlbum");
    assert_eq!(container.child_count.as_deref(), Some("2"));
    assert_eq!(container.description.as_deref(), Some("Apostrophe"));
    assert_eq!(container.long_description.as_deref(), Some("Apostrophe"));
    assert_eq!(container.album_art.len(), 1);
    assert_eq!(
        container.album_art[0].uri,
        format!("{}Items/al1/Images/Primary", PREFIX)
    );
    assert_eq!(container.resources.len(), 2);
}

#[test]
fn test_actor_container_uses_person_route() {
    let root = root(library());
    let actors = root.get_child_recursive(WellKnown::Actors.id()).expect("actors");
    let weaver = child_named(&actors, "Sigourney Weaver").expect("weaver");
    let object = project(&weaver, DeviceSignature::Unknown);
    let container = object.as_container().expect("container");

    assert_eq!(container.id, "p_weaver");
    assert_eq!(container.parent_id, "A");
    assert_eq!(container.class, "object.container.album.videoAlbum");
    assert_eq!(container.description.as_deref(), Some("American actress"));
    assert_eq!(
        container.album_art[0].uri,
        format!("{}Persons/Sigourney%20Weaver/Images/Primary", PREFIX)
    );
    assert_eq!(
        container.icon,
        Some(format!(
            "{}Items/p_weaver/Images/Primary?MaxHeight=120&MaxWidth=120",
            PREFIX
        ))
    );
    assert!(container.actors.is_empty());

    // Personne sans fiche : ni description ni image
    let sheen = child_named(&actors, "Charlie Sheen").expect("sheen");
    let object = project(&sheen, DeviceSignature::Unknown);
    let container = object.as_container().expect("container");
    assert_eq!(container.description, None);
    assert!(container.album_art.is_empty());
    assert_eq!(container.icon, None);
}

#[test]
fn test_season_container() {
    let root = root(library());
    let series = root
        .get_child_recursive(WellKnown::Series.id())
        .and_then(|s| child_named(&s, "Friends"))
        .expect("series");
    let season = child_named(&series, "Season 1").expect("season");
    let object = project(&season, DeviceSignature::Unknown);
    let container = object.as_container().expect("container");

    assert_eq!(container.series_title.as_deref(), Some("Season 1"));
    assert_eq!(container.description.as_deref(), Some("First season"));
    assert_eq!(container.long_description.as_deref(), Some("First season"));
    assert_eq!(container.child_count.as_deref(), Some("2"));
}

#[test]
fn test_projection_is_repeatable() {
    let root = root(library());
    let movie = find(&root, WellKnown::AllVideo, "m1");
    assert_eq!(
        project(&movie, DeviceSignature::Xbox),
        project(&movie, DeviceSignature::Xbox)
    );
}

#[test]
fn test_xbox_sees_different_mp4_flags() {
    let root = root(library());
    let movie = find(&root, WellKnown::AllVideo, "m2");

    let generic = project(&movie, DeviceSignature::Unknown);
    let xbox = project(&movie, DeviceSignature::Xbox);
    let mp4 = |o: &MediaObject| o.resources()[0].protocol_info.clone();
    assert!(mp4(&generic).contains("DLNA.ORG_CI=1"));
    assert!(mp4(&xbox).contains("DLNA.ORG_CI=0"));
}
