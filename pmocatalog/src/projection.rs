//! Projection d'un nœud en objet DIDL-Lite
//!
//! La projection est une fonction pure du nœud, de la signature du client et
//! des préfixes d'URL : elle ne modifie ni le nœud ni la médiathèque. Une
//! métadonnée absente est simplement omise du document.

use crate::artwork::{ArtworkResolver, ImageScope};
use crate::class;
use crate::device::DeviceSignature;
use crate::library::{EntityKind, MediaEntity, person_type};
use crate::node::{DynamicKind, LeafKind, Node, NodeKind};
use crate::resources::ResourceResolver;
use crate::settings::CatalogSettings;
use pmodidl::{Container, Item, MediaObject, PersonRole};

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

fn format_date(entity: &MediaEntity) -> Option<String> {
    entity
        .premiere_date
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn format_rating(entity: &MediaEntity) -> Option<String> {
    entity
        .community_rating
        .filter(|r| r.is_finite())
        .map(|r| r.to_string())
}

/// Crédits et genres d'une entité
#[derive(Debug, Default, PartialEq)]
struct Credits {
    creator: Option<String>,
    actors: Vec<PersonRole>,
    authors: Vec<PersonRole>,
    artists: Vec<PersonRole>,
    director: Option<String>,
    genres: Vec<String>,
}

impl Credits {
    /// Classe chaque personne selon son type
    ///
    /// Les réalisateurs s'accumulent dans `director`, séparés par des espaces
    /// (la chaîne commence donc par un espace). Un type inconnu devient une
    /// entrée `upnp:artist` portant ce type comme rôle.
    fn of(entity: &MediaEntity, skip_unnamed: bool) -> Self {
        let mut credits = Credits {
            genres: entity.genres.clone(),
            ..Default::default()
        };

        for person in &entity.people {
            if skip_unnamed && person.name.trim().is_empty() {
                continue;
            }
            let kind = person.kind.as_deref().unwrap_or_default();
            if kind.eq_ignore_ascii_case(person_type::ACTOR) {
                credits.actors.push(PersonRole::new(
                    &person.name,
                    person.role.as_deref().unwrap_or_default(),
                ));
            } else if kind.eq_ignore_ascii_case(person_type::COMPOSER) {
                credits
                    .authors
                    .push(PersonRole::new(&person.name, person_type::COMPOSER));
                credits.creator = Some(person.name.clone());
            } else if kind.eq_ignore_ascii_case(person_type::WRITER) {
                credits
                    .authors
                    .push(PersonRole::new(&person.name, person_type::WRITER));
            } else if kind.eq_ignore_ascii_case(person_type::DIRECTOR) {
                credits
                    .authors
                    .push(PersonRole::new(&person.name, person_type::DIRECTOR));
                let previous = credits.director.take().unwrap_or_default();
                credits.director = Some(format!("{} {}", previous, person.name));
            } else {
                credits.artists.push(PersonRole::new(&person.name, kind));
            }
        }
        credits
    }

    fn apply_to_container(self, container: &mut Container) {
        container.creator = self.creator;
        container.actors = self.actors;
        container.authors = self.authors;
        container.artists = self.artists;
        container.director = self.director;
        container.genres = self.genres;
    }

    fn apply_to_item(self, item: &mut Item) {
        item.creator = self.creator;
        item.actors = self.actors;
        item.authors = self.authors;
        item.artists.extend(self.artists);
        item.director = self.director;
        item.genres = self.genres;
    }
}

/// Projette les nœuds pour un client donné
pub struct Projector<'a> {
    signature: DeviceSignature,
    resources: ResourceResolver<'a>,
    artwork: ArtworkResolver<'a>,
}

impl<'a> Projector<'a> {
    pub fn new(
        settings: &'a CatalogSettings,
        signature: DeviceSignature,
        prefixes: &'a [String],
    ) -> Self {
        Self {
            signature,
            resources: ResourceResolver::new(settings, signature, prefixes),
            artwork: ArtworkResolver::new(settings, prefixes),
        }
    }

    pub fn project(&self, node: &Node) -> MediaObject {
        match node.kind() {
            NodeKind::Leaf(LeafKind::Video) => self.video_item(node).into(),
            NodeKind::Leaf(LeafKind::Music) => self.music_item(node).into(),
            _ => self.container(node).into(),
        }
    }

    fn scope(node: &Node) -> ImageScope {
        match node.kind() {
            NodeKind::Dynamic(DynamicKind::Actor) => ImageScope::Person,
            NodeKind::Dynamic(DynamicKind::MusicGenre | DynamicKind::VideoGenre) => {
                ImageScope::Genre
            }
            _ => ImageScope::Item,
        }
    }

    fn container(&self, node: &Node) -> Container {
        let entity = node.entity();
        let scope = Self::scope(node);

        let mut container = Container {
            id: node.id().to_string(),
            parent_id: node.parent_id().to_string(),
            restricted: Some("1".to_string()),
            child_count: Some(node.child_count().to_string()),
            title: node.title().to_string(),
            class: node.class().to_string(),
            ..Default::default()
        };

        match node.kind() {
            NodeKind::WellKnown(_) => {
                Self::describe_container(&mut container, entity);
                Credits::of(entity, false).apply_to_container(&mut container);
            }
            NodeKind::Dynamic(kind @ (DynamicKind::Series | DynamicKind::Season | DynamicKind::Folder)) => {
                Self::describe_container(&mut container, entity);
                container.series_title = non_empty(entity.name.as_str());
                if kind == DynamicKind::Season {
                    container.description = entity.overview.clone().and_then(non_empty);
                }
                Credits::of(entity, false).apply_to_container(&mut container);
            }
            NodeKind::Dynamic(DynamicKind::Actor) => {
                container.description = entity.overview.clone().and_then(non_empty);
                container.long_description = entity.overview.clone().and_then(non_empty);
            }
            NodeKind::Dynamic(_) => {
                container.description = non_empty(entity.name.as_str());
                container.long_description = non_empty(entity.name.as_str());
            }
            NodeKind::Leaf(_) => {}
        }

        container.resources = self.artwork.thumbnails(scope, entity);
        container.album_art = self.artwork.album_art(scope, entity);
        // L'icône passe toujours par la route Items, y compris pour les personnes
        container.icon = non_empty(self.artwork.icon_uri(ImageScope::Item, entity));
        container
    }

    fn describe_container(container: &mut Container, entity: &MediaEntity) {
        container.date = format_date(entity);
        container.language = entity.language.clone().and_then(non_empty);
        container.long_description = entity.overview.clone().and_then(non_empty);
        container.rating = format_rating(entity);
    }

    fn base_item(node: &Node, class: &str) -> Item {
        let entity = node.entity();
        Item {
            id: node.id().to_string(),
            parent_id: node.parent_id().to_string(),
            restricted: Some("1".to_string()),
            title: entity.name.clone(),
            class: class.to_string(),
            language: entity.language.clone().and_then(non_empty),
            description: entity.overview.clone().and_then(non_empty),
            long_description: entity.overview.clone().and_then(non_empty),
            rating: format_rating(entity),
            ..Default::default()
        }
    }

    fn video_item(&self, node: &Node) -> Item {
        let entity = node.entity();
        let mut item = Self::base_item(node, class::VIDEO_ITEM);

        if entity.kind == EntityKind::Episode {
            if self.signature.is_dvr() {
                item.class = class::VIDEO_BROADCAST.to_string();
                item.episode_number = entity.index_number.map(|n| n.to_string());
                item.series_title = entity.series_name.clone().and_then(non_empty);
                item.program_title = non_empty(entity.name.as_str());
            }
            if let Some(season) = entity.season_name.as_deref().filter(|s| !s.is_empty()) {
                item.title = format!("{}-{}", season, item.title);
            }
            if let Some(series) = entity.series_name.as_deref().filter(|s| !s.is_empty()) {
                item.title = format!("{}-{}", series, item.title);
            }
        }

        item.date = format_date(entity);
        Credits::of(entity, false).apply_to_item(&mut item);

        item.resources = self.resources.video_resources(entity);
        item.resources
            .extend(self.artwork.thumbnails(ImageScope::Item, entity));
        item.icon = non_empty(self.artwork.icon_uri(ImageScope::Item, entity));
        item
    }

    fn music_item(&self, node: &Node) -> Item {
        let entity = node.entity();
        let mut item = Self::base_item(node, class::MUSIC_TRACK);

        item.date = format_date(entity).or_else(|| entity.production_year.map(|y| y.to_string()));
        item.original_track_number = entity.index_number.map(|n| n.to_string());

        let artist = entity.artist.as_deref().filter(|a| !a.is_empty());
        if let Some(artist) = artist {
            item.artists.push(PersonRole::named(artist));
        }
        item.contributor = entity.album_artist.clone().and_then(non_empty);
        item.album = entity.album.clone().and_then(non_empty);

        Credits::of(entity, true).apply_to_item(&mut item);

        // Plusieurs renderers ne lisent l'artiste que sous l'un de ces rôles
        if let Some(artist) = artist {
            for role in ["MusicArtist", "artist", "Performer"] {
                item.artists.push(PersonRole::new(artist, role));
            }
        }

        item.resources = self.resources.audio_resources(entity);
        item.resources
            .extend(self.artwork.thumbnails(ImageScope::Item, entity));
        item.album_art = self.artwork.album_art(ImageScope::Item, entity);
        item.icon = non_empty(self.artwork.icon_uri(ImageScope::Item, entity));
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PersonInfo;

    #[test]
    fn test_credits_classification() {
        let entity = MediaEntity::new("x", EntityKind::Movie, "m")
            .with_person(PersonInfo::actor("Ann", "Lead"))
            .with_person(PersonInfo::new("Ben", "composer"))
            .with_person(PersonInfo::new("Cid", "Writer"))
            .with_person(PersonInfo::new("Dan", "DIRECTOR"))
            .with_person(PersonInfo::new("Eve", "Director"))
            .with_person(PersonInfo::new("Fay", "Producer"))
            .with_genres(["Drama", "drama"]);

        let credits = Credits::of(&entity, false);
        assert_eq!(credits.actors, vec![PersonRole::new("Ann", "Lead")]);
        assert_eq!(credits.creator.as_deref(), Some("Ben"));
        assert_eq!(
            credits.authors,
            vec![
                PersonRole::new("Ben", "Composer"),
                PersonRole::new("Cid", "Writer"),
                PersonRole::new("Dan", "Director"),
                PersonRole::new("Eve", "Director"),
            ]
        );
        assert_eq!(credits.director.as_deref(), Some(" Dan Eve"));
        assert_eq!(credits.artists, vec![PersonRole::new("Fay", "Producer")]);
        assert_eq!(credits.genres, vec!["Drama", "drama"]);
    }

    #[test]
    fn test_credits_skip_unnamed() {
        let entity = MediaEntity::new("x", EntityKind::Audio, "t")
            .with_person(PersonInfo::new("", "Composer"))
            .with_person(PersonInfo::new("Ray", "Composer"));

        assert_eq!(Credits::of(&entity, true).authors.len(), 1);
        assert_eq!(Credits::of(&entity, false).authors.len(), 2);
    }

    #[test]
    fn test_rating_format() {
        let mut entity = MediaEntity::new("x", EntityKind::Movie, "m").with_community_rating(7.5);
        assert_eq!(format_rating(&entity).as_deref(), Some("7.5"));
        entity.community_rating = Some(f32::NAN);
        assert_eq!(format_rating(&entity), None);
    }
}
