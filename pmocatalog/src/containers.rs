//! Calcul des enfants de chaque variante de nœud
//!
//! Chaque conteneur émet une requête vers la médiathèque au moment où ses
//! enfants sont demandés. Genres et acteurs ne sont pas des relations
//! navigables de la médiathèque : ils sont extraits de toutes les entités
//! concernées, dédupliqués puis résolus en fiches partagées.

use crate::class::eq_ignore_case;
use crate::library::{EntityKind, MediaEntity, MediaLibrary, User};
use crate::node::{DynamicKind, LeafKind, Node, NodeKind};
use crate::registry::WellKnown;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{trace, warn};

pub(crate) fn children_of(node: &Node) -> Vec<Node> {
    let children = match node.kind() {
        NodeKind::WellKnown(wk) => well_known_children(node, wk),
        NodeKind::Dynamic(kind) => dynamic_children(node, kind),
        NodeKind::Leaf(_) => return Vec::new(),
    };
    trace!(id = %node.id(), count = children.len(), "Children computed");
    children
}

fn wrap(node: &Node, kind: NodeKind, entities: Vec<Arc<MediaEntity>>) -> Vec<Node> {
    entities
        .into_iter()
        .map(|entity| node.entity_child(kind, entity))
        .collect()
}

fn well_known_children(node: &Node, wk: WellKnown) -> Vec<Node> {
    let library = node.library();
    let user = node.user();
    let root = node.entity();

    match wk {
        WellKnown::Root | WellKnown::Music | WellKnown::Video | WellKnown::Playlists => wk
            .children()
            .iter()
            .map(|child| node.well_known_child(*child))
            .collect(),

        WellKnown::AllMusic => wrap(
            node,
            NodeKind::Leaf(LeafKind::Music),
            library.recursive_children_where(root, user, &|e| e.kind.is_audio()),
        ),
        WellKnown::MusicGenre => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::MusicGenre),
            collect_genres(library, root, user, |e| e.kind.is_audio()),
        ),
        WellKnown::MusicArtist => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::MusicArtist),
            distinct_sorted(library.recursive_children_where(root, user, &|e| {
                e.kind == EntityKind::MusicArtist
            })),
        ),
        WellKnown::MusicAlbum => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::MusicAlbum),
            distinct_sorted(library.recursive_children_where(root, user, &|e| {
                e.kind == EntityKind::MusicAlbum
            })),
        ),

        WellKnown::AllVideo => wrap(
            node,
            NodeKind::Leaf(LeafKind::Video),
            library.recursive_children_where(root, user, &|e| e.kind.is_video()),
        ),
        WellKnown::VideoGenre => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::VideoGenre),
            collect_genres(library, root, user, |e| e.kind.is_video()),
        ),
        WellKnown::Actors => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::Actor),
            collect_actors(library, root, user),
        ),
        WellKnown::Series => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::Series),
            distinct_sorted(library.recursive_children_where(root, user, &|e| {
                e.kind == EntityKind::Series
            })),
        ),
        WellKnown::VideoFolders => folder_children(node),

        // Pas encore de listes de lecture dans la médiathèque
        WellKnown::AllPlaylists | WellKnown::PlaylistFolders => Vec::new(),
    }
}

fn dynamic_children(node: &Node, kind: DynamicKind) -> Vec<Node> {
    let library = node.library();
    let user = node.user();
    let entity = node.entity();

    match kind {
        DynamicKind::Series => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::Season),
            library.recursive_children_where(entity, user, &|e| e.kind == EntityKind::Season),
        ),
        DynamicKind::Season => wrap(
            node,
            NodeKind::Leaf(LeafKind::Video),
            sorted(library.recursive_children_where(entity, user, &|e| e.kind.is_video())),
        ),
        DynamicKind::Folder => folder_children(node),
        DynamicKind::MusicArtist => wrap(
            node,
            NodeKind::Dynamic(DynamicKind::MusicAlbum),
            sorted(library.recursive_children_where(entity, user, &|e| {
                e.kind == EntityKind::MusicAlbum
            })),
        ),
        DynamicKind::MusicAlbum => wrap(
            node,
            NodeKind::Leaf(LeafKind::Music),
            sorted(library.recursive_children_where(entity, user, &|e| e.kind.is_audio())),
        ),

        // Genres et personnes ne sont pas des dossiers : on repart de la racine
        DynamicKind::MusicGenre => {
            let root = library.root_folder(user);
            let genre = entity.name.as_str();
            wrap(
                node,
                NodeKind::Leaf(LeafKind::Music),
                library.recursive_children_where(&root, user, &|e| {
                    e.kind.is_audio() && e.has_genre(genre)
                }),
            )
        }
        DynamicKind::VideoGenre => {
            let root = library.root_folder(user);
            let genre = entity.name.as_str();
            wrap(
                node,
                NodeKind::Leaf(LeafKind::Video),
                library.recursive_children_where(&root, user, &|e| {
                    e.kind.is_video() && e.has_genre(genre)
                }),
            )
        }
        DynamicKind::Actor => {
            let root = library.root_folder(user);
            let actor = entity.name.as_str();
            wrap(
                node,
                NodeKind::Leaf(LeafKind::Video),
                library.recursive_children_where(&root, user, &|e| {
                    e.kind.is_video()
                        && e.people
                            .iter()
                            .any(|p| p.is_actor() && eq_ignore_case(&p.name, actor))
                }),
            )
        }
    }
}

/// Sous-dossiers directs, puis vidéos directes
fn folder_children(node: &Node) -> Vec<Node> {
    let children = node.library().children(node.entity(), node.user());
    let (folders, others): (Vec<_>, Vec<_>) = children.into_iter().partition(|e| e.kind.is_folder());
    let videos = others.into_iter().filter(|e| e.kind.is_video()).collect();

    let mut nodes = wrap(node, NodeKind::Dynamic(DynamicKind::Folder), folders);
    nodes.extend(wrap(node, NodeKind::Leaf(LeafKind::Video), videos));
    nodes
}

/// Tri stable par clé de tri
fn sorted(mut entities: Vec<Arc<MediaEntity>>) -> Vec<Arc<MediaEntity>> {
    entities.sort_by_cached_key(|e| e.sort_key());
    entities
}

/// Premier exemplaire de chaque nom (sans casse), puis tri par clé de tri
fn distinct_sorted(entities: Vec<Arc<MediaEntity>>) -> Vec<Arc<MediaEntity>> {
    let mut seen = HashSet::new();
    let unique = entities
        .into_iter()
        .filter(|e| seen.insert(e.name.to_lowercase()))
        .collect();
    sorted(unique)
}

/// Noms distincts (sans casse), dans l'ordre de première apparition
fn distinct_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

/// Résout chaque nom en fiche partagée ; les échecs sont journalisés et ignorés
fn resolve_shared<F>(names: Vec<String>, what: &'static str, resolve: F) -> Vec<Arc<MediaEntity>>
where
    F: Fn(&str) -> crate::Result<Arc<MediaEntity>> + Sync,
{
    let resolved: Vec<Arc<MediaEntity>> = names
        .par_iter()
        .filter_map(|name| match resolve(name) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(name = %name, error = %e, "Unable to resolve shared {}", what);
                None
            }
        })
        .collect();
    sorted(resolved)
}

/// Genres des entités retenues par `predicate`
fn collect_genres<P>(
    library: &dyn MediaLibrary,
    root: &MediaEntity,
    user: &User,
    predicate: P,
) -> Vec<Arc<MediaEntity>>
where
    P: Fn(&MediaEntity) -> bool + Sync,
{
    let entities = library.recursive_children(root, user);
    let names: Vec<String> = entities
        .par_iter()
        .filter(|e| predicate(e))
        .flat_map_iter(|e| {
            e.genres
                .iter()
                .filter(|g| !g.trim().is_empty())
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect();

    resolve_shared(distinct_names(names), "genre", |name| library.genre(name))
}

/// Acteurs crédités sur les vidéos
fn collect_actors(
    library: &dyn MediaLibrary,
    root: &MediaEntity,
    user: &User,
) -> Vec<Arc<MediaEntity>> {
    let entities = library.recursive_children(root, user);
    let names: Vec<String> = entities
        .par_iter()
        .filter(|e| e.kind.is_video())
        .flat_map_iter(|e| {
            e.people
                .iter()
                .filter(|p| p.is_actor() && !p.name.trim().is_empty())
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    resolve_shared(distinct_names(names), "person", |name| library.person(name))
}
