//! Parcours d'une petite médiathèque en mémoire
//!
//! Construit une médiathèque de démonstration, lit les réglages DLNA depuis
//! pmoconfig puis affiche le DIDL-Lite de quelques requêtes Browse et Search.
//!
//! Usage:
//!   cargo run -p pmocatalog --example browse_library -- [object_id] [user-agent]
//!
//! Exemple:
//!   RUST_LOG=pmocatalog=debug cargo run -p pmocatalog --example browse_library -- 9 "Xbox/2.0"

use pmocatalog::{
    BrowseFlag, BrowseRequest, CatalogConfigExt, ContentDirectory, DeviceSignature, EntityKind,
    ImageKind, MediaEntity, MemoryLibrary, PersonInfo, SearchRequest,
};
use pmoconfig::get_config;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn demo_library() -> pmocatalog::Result<MemoryLibrary> {
    let library = MemoryLibrary::new("Media");

    let music = library.insert(None, MediaEntity::new("music", EntityKind::Folder, "Music"))?;
    let artist = library.insert(
        Some(&music.id),
        MediaEntity::new("miles", EntityKind::MusicArtist, "Miles Davis"),
    )?;
    let album = library.insert(
        Some(&artist.id),
        MediaEntity::new("kob", EntityKind::MusicAlbum, "Kind of Blue")
            .with_image(ImageKind::Primary, "/covers/kind_of_blue.jpg"),
    )?;
    for (index, title) in ["So What", "Freddie Freeloader", "Blue in Green"]
        .iter()
        .enumerate()
    {
        library.insert(
            Some(&album.id),
            MediaEntity::new(format!("kob-{}", index + 1), EntityKind::Audio, *title)
                .with_index_number(index as u32 + 1)
                .with_album("Miles Davis", "Miles Davis", "Kind of Blue")
                .with_genres(["Jazz"])
                .with_production_year(1959)
                .with_run_time(Duration::from_secs(545)),
        )?;
    }

    let films = library.insert(None, MediaEntity::new("films", EntityKind::Folder, "Films"))?;
    library.insert(
        Some(&films.id),
        MediaEntity::new("metropolis", EntityKind::Movie, "Metropolis")
            .with_genres(["Sci-Fi", "Drama"])
            .with_person(PersonInfo::actor("Brigitte Helm", "Maria"))
            .with_person(PersonInfo::new("Fritz Lang", "Director"))
            .with_path("/media/films/metropolis.mkv")
            .with_run_time(Duration::from_secs(9180)),
    )?;

    Ok(library)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();
    if let Some(level) = config.get_log_directive()? {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .init();
    }

    let args: Vec<String> = env::args().collect();
    let object_id = args.get(1).map(String::as_str).unwrap_or("0");
    let signature = args
        .get(2)
        .map(|ua| DeviceSignature::from_user_agent(ua))
        .unwrap_or_default();

    let settings = config.get_catalog_settings()?;
    println!("URL prefixes: {:?}", settings.url_prefixes);

    let directory = ContentDirectory::new(Arc::new(demo_library()?), settings);

    for flag in [BrowseFlag::Metadata, BrowseFlag::DirectChildren] {
        let request = BrowseRequest::new(object_id, flag).with_signature(signature);
        let response = directory.browse(&request)?;
        println!();
        println!(
            "=== {} {} ({} / {}) ===",
            flag, object_id, response.number_returned, response.total_matches
        );
        println!("{}", response.result);
    }

    let search = SearchRequest::new("0", r#"upnp:class derivedfrom "object.item.audioItem""#)
        .with_signature(signature);
    let response = directory.search_request(&search)?;
    println!();
    println!(
        "=== Search audio ({} / {}) ===",
        response.number_returned, response.total_matches
    );
    println!("{}", response.result);

    Ok(())
}
