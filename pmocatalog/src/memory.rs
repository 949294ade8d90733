//! Médiathèque en mémoire
//!
//! Implémentation de [`MediaLibrary`] utilisée par les tests et les démos :
//! un index parent → enfants, et des fiches partagées (genres, personnes)
//! créées à la demande avec un identifiant UUID stable.

use crate::library::{EntityId, EntityKind, MediaEntity, MediaLibrary, User};
use crate::{CatalogError, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

struct Inner {
    root: Arc<MediaEntity>,
    entities: HashMap<EntityId, Arc<MediaEntity>>,
    children: HashMap<EntityId, Vec<EntityId>>,
    parents: HashMap<EntityId, EntityId>,
    genres: HashMap<String, Arc<MediaEntity>>,
    persons: HashMap<String, Arc<MediaEntity>>,
}

/// Médiathèque thread-safe tenue entièrement en mémoire
///
/// # Exemple
///
/// ```
/// use pmocatalog::{EntityKind, MediaEntity, MemoryLibrary};
///
/// let library = MemoryLibrary::new("Media");
/// let folder = library
///     .insert(None, MediaEntity::new("f1", EntityKind::Folder, "Films"))
///     .unwrap();
/// library
///     .insert(Some(&folder.id), MediaEntity::new("m1", EntityKind::Movie, "Alien"))
///     .unwrap();
///
/// assert_eq!(library.len(), 2);
/// ```
pub struct MemoryLibrary {
    inner: RwLock<Inner>,
}

impl MemoryLibrary {
    /// Crée une médiathèque vide dont le dossier racine porte `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Arc::new(MediaEntity::new(
            Uuid::new_v4().to_string(),
            EntityKind::CollectionFolder,
            root_name,
        ));
        let mut entities = HashMap::new();
        entities.insert(root.id.clone(), root.clone());

        Self {
            inner: RwLock::new(Inner {
                root,
                entities,
                children: HashMap::new(),
                parents: HashMap::new(),
                genres: HashMap::new(),
                persons: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifiant du dossier racine
    pub fn root_id(&self) -> EntityId {
        self.read().root.id.clone()
    }

    /// Ajoute `entity` sous `parent_id` (la racine si `None`)
    ///
    /// Échoue si le parent est inconnu ou si l'identifiant est déjà utilisé.
    pub fn insert(&self, parent_id: Option<&str>, entity: MediaEntity) -> Result<Arc<MediaEntity>> {
        let mut inner = self.write();
        let parent_id = match parent_id {
            Some(id) => id.to_string(),
            None => inner.root.id.clone(),
        };

        if !inner.entities.contains_key(&parent_id) {
            return Err(CatalogError::Library(format!("unknown parent {}", parent_id)));
        }
        if inner.entities.contains_key(&entity.id) {
            return Err(CatalogError::Library(format!("duplicate entity id {}", entity.id)));
        }

        let entity = Arc::new(entity);
        debug!(id = %entity.id, parent = %parent_id, kind = ?entity.kind, "Entity inserted");
        inner.entities.insert(entity.id.clone(), entity.clone());
        inner.parents.insert(entity.id.clone(), parent_id.clone());
        inner
            .children
            .entry(parent_id)
            .or_default()
            .push(entity.id.clone());
        Ok(entity)
    }

    /// Remplace une entité existante en conservant sa position dans l'arbre
    pub fn update(&self, entity: MediaEntity) -> Result<Arc<MediaEntity>> {
        let mut inner = self.write();
        if !inner.entities.contains_key(&entity.id) {
            return Err(CatalogError::Library(format!("unknown entity {}", entity.id)));
        }
        let entity = Arc::new(entity);
        if inner.root.id == entity.id {
            inner.root = entity.clone();
        }
        inner.entities.insert(entity.id.clone(), entity.clone());
        Ok(entity)
    }

    /// Retire une entité et tout son sous-arbre
    ///
    /// Retourne l'entité retirée, `None` si elle est inconnue. La racine ne
    /// peut pas être retirée.
    pub fn remove(&self, id: &str) -> Option<Arc<MediaEntity>> {
        let mut inner = self.write();
        if inner.root.id == id {
            return None;
        }
        let removed = inner.entities.get(id).cloned()?;

        if let Some(parent) = inner.parents.remove(id) {
            if let Some(siblings) = inner.children.get_mut(&parent) {
                siblings.retain(|c| c != id);
            }
        }

        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            inner.entities.remove(&current);
            inner.parents.remove(&current);
            if let Some(children) = inner.children.remove(&current) {
                pending.extend(children);
            }
        }

        debug!(id = %id, "Entity removed");
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<Arc<MediaEntity>> {
        self.read().entities.get(id).cloned()
    }

    /// Nombre d'entités hors racine et hors fiches partagées
    pub fn len(&self) -> usize {
        self.read().entities.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enregistre une fiche de personne complète (images, biographie)
    ///
    /// La fiche remplace toute fiche existante portant le même nom.
    pub fn register_person(&self, person: MediaEntity) -> Arc<MediaEntity> {
        let person = Arc::new(person);
        self.write()
            .persons
            .insert(person.name.to_lowercase(), person.clone());
        person
    }

    /// Enregistre une fiche de genre complète
    pub fn register_genre(&self, genre: MediaEntity) -> Arc<MediaEntity> {
        let genre = Arc::new(genre);
        self.write()
            .genres
            .insert(genre.name.to_lowercase(), genre.clone());
        genre
    }

    fn shared_entity(
        &self,
        name: &str,
        kind: EntityKind,
        select: fn(&mut Inner) -> &mut HashMap<String, Arc<MediaEntity>>,
    ) -> Result<Arc<MediaEntity>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Library(format!(
                "cannot resolve {:?} with a blank name",
                kind
            )));
        }
        let mut inner = self.write();
        let entity = select(&mut inner)
            .entry(name.to_lowercase())
            .or_insert_with(|| {
                debug!(name = %name, kind = ?kind, "Shared entity created");
                Arc::new(MediaEntity::new(Uuid::new_v4().to_string(), kind, name))
            })
            .clone();
        Ok(entity)
    }
}

impl MediaLibrary for MemoryLibrary {
    fn root_folder(&self, _user: &User) -> Arc<MediaEntity> {
        self.read().root.clone()
    }

    fn children(&self, parent: &MediaEntity, user: &User) -> Vec<Arc<MediaEntity>> {
        let inner = self.read();
        inner
            .children
            .get(&parent.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.entities.get(id))
                    .filter(|entity| user.can_see(entity))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn genre(&self, name: &str) -> Result<Arc<MediaEntity>> {
        self.shared_entity(name, EntityKind::Genre, |inner| &mut inner.genres)
    }

    fn person(&self, name: &str) -> Result<Arc<MediaEntity>> {
        self.shared_entity(name, EntityKind::Person, |inner| &mut inner.persons)
    }
}
