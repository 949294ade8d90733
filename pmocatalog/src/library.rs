//! Surface de la médiathèque consommée par le catalogue
//!
//! Le catalogue ne possède ni ne modifie les entités : il les reçoit en
//! `Arc<MediaEntity>` depuis une implémentation de [`MediaLibrary`] et les
//! relit à chaque parcours.

use crate::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Identifiant opaque d'une entité de la médiathèque
pub type EntityId = String;

/// Type d'exécution d'une entité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Folder,
    CollectionFolder,
    Audio,
    MusicAlbum,
    MusicArtist,
    Video,
    Movie,
    Episode,
    Series,
    Season,
    Playlist,
    Genre,
    Person,
}

impl EntityKind {
    /// Vidéo au sens large : films et épisodes sont des vidéos
    pub fn is_video(self) -> bool {
        matches!(self, EntityKind::Video | EntityKind::Movie | EntityKind::Episode)
    }

    pub fn is_audio(self) -> bool {
        self == EntityKind::Audio
    }

    /// Entité qui contient d'autres entités dans la médiathèque
    pub fn is_folder(self) -> bool {
        matches!(
            self,
            EntityKind::Folder
                | EntityKind::CollectionFolder
                | EntityKind::MusicAlbum
                | EntityKind::MusicArtist
                | EntityKind::Series
                | EntityKind::Season
                | EntityKind::Playlist
        )
    }
}

/// Type d'image attachée à une entité
///
/// Le nom de la variante est utilisé tel quel dans les URIs d'images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageKind {
    Primary,
    Art,
    Backdrop,
    Banner,
    Logo,
    Thumb,
    Disc,
    Box,
    Screenshot,
    Menu,
    Chapter,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Primary => "Primary",
            ImageKind::Art => "Art",
            ImageKind::Backdrop => "Backdrop",
            ImageKind::Banner => "Banner",
            ImageKind::Logo => "Logo",
            ImageKind::Thumb => "Thumb",
            ImageKind::Disc => "Disc",
            ImageKind::Box => "Box",
            ImageKind::Screenshot => "Screenshot",
            ImageKind::Menu => "Menu",
            ImageKind::Chapter => "Chapter",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types de personnes reconnus par la projection
pub mod person_type {
    pub const ACTOR: &str = "Actor";
    pub const COMPOSER: &str = "Composer";
    pub const WRITER: &str = "Writer";
    pub const DIRECTOR: &str = "Director";
    pub const GUEST_STAR: &str = "GuestStar";
    pub const PRODUCER: &str = "Producer";
}

/// Personne créditée sur une entité
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonInfo {
    pub name: String,
    /// Rôle tenu (personnage pour un acteur)
    pub role: Option<String>,
    /// Type de crédit, comparé sans tenir compte de la casse (voir [`person_type`])
    pub kind: Option<String>,
}

impl PersonInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            kind: Some(kind.into()),
        }
    }

    pub fn actor(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Some(role.into()),
            kind: Some(person_type::ACTOR.to_string()),
        }
    }

    pub fn is_actor(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case(person_type::ACTOR))
    }
}

/// Attributs du flux vidéo principal d'une entité
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaStreamInfo {
    pub bitrate: Option<u32>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

/// Entité de la médiathèque
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub sort_name: Option<String>,
    pub overview: Option<String>,
    pub language: Option<String>,
    pub premiere_date: Option<NaiveDate>,
    pub production_year: Option<i32>,
    pub community_rating: Option<f32>,
    pub genres: Vec<String>,
    pub people: Vec<PersonInfo>,
    pub images: BTreeMap<ImageKind, PathBuf>,
    pub path: Option<PathBuf>,
    pub run_time: Option<Duration>,
    pub default_video_stream: Option<MediaStreamInfo>,
    /// Numéro d'épisode (ou de piste)
    pub index_number: Option<u32>,
    pub series_name: Option<String>,
    pub season_name: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
}

impl MediaEntity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            sort_name: None,
            overview: None,
            language: None,
            premiere_date: None,
            production_year: None,
            community_rating: None,
            genres: Vec::new(),
            people: Vec::new(),
            images: BTreeMap::new(),
            path: None,
            run_time: None,
            default_video_stream: None,
            index_number: None,
            series_name: None,
            season_name: None,
            artist: None,
            album_artist: None,
            album: None,
        }
    }

    /// Clé de tri : nom de tri s'il existe, sinon le nom, en minuscules
    pub fn sort_key(&self) -> String {
        self.sort_name
            .as_deref()
            .unwrap_or(&self.name)
            .to_lowercase()
    }

    pub fn has_image(&self, kind: ImageKind) -> bool {
        self.images.contains_key(&kind)
    }

    /// Extension du fichier source, point compris (`.mkv`)
    pub fn extension(&self) -> Option<String> {
        let ext = self.path.as_ref()?.extension()?.to_str()?;
        Some(format!(".{}", ext))
    }

    /// Le genre est-il porté par l'entité (comparaison sans casse)
    pub fn has_genre(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();
        self.genres.iter().any(|g| g.to_lowercase() == genre)
    }

    pub fn with_sort_name(mut self, sort_name: impl Into<String>) -> Self {
        self.sort_name = Some(sort_name.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_premiere_date(mut self, date: NaiveDate) -> Self {
        self.premiere_date = Some(date);
        self
    }

    pub fn with_production_year(mut self, year: i32) -> Self {
        self.production_year = Some(year);
        self
    }

    pub fn with_community_rating(mut self, rating: f32) -> Self {
        self.community_rating = Some(rating);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_person(mut self, person: PersonInfo) -> Self {
        self.people.push(person);
        self
    }

    pub fn with_image(mut self, kind: ImageKind, path: impl Into<PathBuf>) -> Self {
        self.images.insert(kind, path.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_run_time(mut self, run_time: Duration) -> Self {
        self.run_time = Some(run_time);
        self
    }

    pub fn with_video_stream(mut self, stream: MediaStreamInfo) -> Self {
        self.default_video_stream = Some(stream);
        self
    }

    pub fn with_index_number(mut self, index: u32) -> Self {
        self.index_number = Some(index);
        self
    }

    pub fn with_series(mut self, series: impl Into<String>, season: Option<&str>) -> Self {
        self.series_name = Some(series.into());
        self.season_name = season.map(String::from);
        self
    }

    pub fn with_album(
        mut self,
        artist: impl Into<String>,
        album_artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        self.artist = Some(artist.into());
        self.album_artist = Some(album_artist.into());
        self.album = Some(album.into());
        self
    }
}

/// Utilisateur pour lequel l'arbre est construit
///
/// Les entités listées dans `blocked` (et leurs descendants) sont invisibles
/// pour cet utilisateur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub blocked: HashSet<EntityId>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            blocked: HashSet::new(),
        }
    }

    pub fn with_blocked(mut self, id: impl Into<EntityId>) -> Self {
        self.blocked.insert(id.into());
        self
    }

    pub fn can_see(&self, entity: &MediaEntity) -> bool {
        !self.blocked.contains(&entity.id)
    }
}

/// Surface de requête de la médiathèque
///
/// Toutes les requêtes sont évaluées au moment de l'appel : le catalogue
/// reflète l'état courant de la médiathèque et ne met rien en cache.
pub trait MediaLibrary: Send + Sync {
    /// Dossier racine de la médiathèque vue par `user`
    fn root_folder(&self, user: &User) -> Arc<MediaEntity>;

    /// Enfants directs de `parent` visibles par `user`, dans l'ordre de la médiathèque
    fn children(&self, parent: &MediaEntity, user: &User) -> Vec<Arc<MediaEntity>>;

    /// Tous les descendants de `parent` visibles par `user`
    ///
    /// L'implémentation par défaut parcourt [`MediaLibrary::children`] en
    /// profondeur, chaque entité précédant ses propres descendants.
    fn recursive_children(&self, parent: &MediaEntity, user: &User) -> Vec<Arc<MediaEntity>> {
        let mut result = Vec::new();
        let mut stack: Vec<Arc<MediaEntity>> = self.children(parent, user);
        stack.reverse();
        while let Some(entity) = stack.pop() {
            let mut children = self.children(&entity, user);
            children.reverse();
            stack.extend(children);
            result.push(entity);
        }
        result
    }

    /// Résout (ou crée) l'entité partagée d'un genre
    fn genre(&self, name: &str) -> Result<Arc<MediaEntity>>;

    /// Résout (ou crée) l'entité partagée d'une personne
    fn person(&self, name: &str) -> Result<Arc<MediaEntity>>;

    /// Descendants de `parent` filtrés par `predicate`
    fn recursive_children_where(
        &self,
        parent: &MediaEntity,
        user: &User,
        predicate: &dyn Fn(&MediaEntity) -> bool,
    ) -> Vec<Arc<MediaEntity>> {
        self.recursive_children(parent, user)
            .into_iter()
            .filter(|e| predicate(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(EntityKind::Episode.is_video());
        assert!(EntityKind::Movie.is_video());
        assert!(!EntityKind::Audio.is_video());
        assert!(EntityKind::Series.is_folder());
        assert!(!EntityKind::Video.is_folder());
    }

    #[test]
    fn test_sort_key_prefers_sort_name() {
        let plain = MediaEntity::new("1", EntityKind::Movie, "The Movie");
        let sorted = plain.clone().with_sort_name("Movie, The");

        assert_eq!(plain.sort_key(), "the movie");
        assert_eq!(sorted.sort_key(), "movie, the");
    }

    #[test]
    fn test_extension_keeps_dot() {
        let entity = MediaEntity::new("1", EntityKind::Video, "v").with_path("/media/a.b/clip.MKV");
        assert_eq!(entity.extension().as_deref(), Some(".MKV"));

        let bare = MediaEntity::new("2", EntityKind::Video, "v").with_path("/media/clip");
        assert_eq!(bare.extension(), None);
    }

    #[test]
    fn test_has_genre_ignores_case() {
        let entity = MediaEntity::new("1", EntityKind::Movie, "m").with_genres(["Comedy", "Drama"]);
        assert!(entity.has_genre("comedy"));
        assert!(!entity.has_genre("Horror"));
    }

    #[test]
    fn test_person_is_actor() {
        assert!(PersonInfo::actor("Jane", "Herself").is_actor());
        assert!(PersonInfo::new("Jane", "actor").is_actor());
        assert!(!PersonInfo::new("John", person_type::DIRECTOR).is_actor());
    }
}
