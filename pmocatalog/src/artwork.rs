//! Vignettes, pochettes et icône d'une entité

use crate::library::{ImageKind, MediaEntity};
use crate::resources::normalize_uri;
use crate::settings::CatalogSettings;
use pmodidl::{AlbumArt, Resource};
use url::Url;

/// Types d'image essayés, dans l'ordre, pour l'icône
pub const ICON_PRIORITY: [ImageKind; 4] = [
    ImageKind::Logo,
    ImageKind::Thumb,
    ImageKind::Primary,
    ImageKind::Menu,
];

const ICON_QUERY: &str = "?MaxHeight=120&MaxWidth=120";

/// Route HTTP sous laquelle les images d'une entité sont servies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScope {
    /// `Items/{id}/Images/...`
    Item,
    /// `Persons/{name}/Images/...`
    Person,
    /// `Genre/{name}/Images/...`
    Genre,
}

impl ImageScope {
    fn path(self, entity: &MediaEntity) -> String {
        match self {
            ImageScope::Item => format!("Items/{}", entity.id),
            ImageScope::Person => format!("Persons/{}", urlencoding::encode(&entity.name)),
            ImageScope::Genre => format!("Genre/{}", urlencoding::encode(&entity.name)),
        }
    }
}

/// Construit les références d'images pour un ensemble de préfixes
pub struct ArtworkResolver<'a> {
    settings: &'a CatalogSettings,
    prefixes: &'a [String],
}

impl<'a> ArtworkResolver<'a> {
    pub fn new(settings: &'a CatalogSettings, prefixes: &'a [String]) -> Self {
        Self { settings, prefixes }
    }

    fn image_uri(
        prefix: &str,
        scope: ImageScope,
        entity: &MediaEntity,
        kind: ImageKind,
        query: &str,
    ) -> Option<String> {
        normalize_uri(&format!(
            "{}{}/Images/{}{}",
            prefix,
            scope.path(entity),
            kind,
            query
        ))
    }

    /// Une vignette par image, par préfixe et par profil
    pub fn thumbnails(&self, scope: ImageScope, entity: &MediaEntity) -> Vec<Resource> {
        let mut resources = Vec::new();
        for kind in entity.images.keys() {
            for prefix in self.prefixes {
                for profile in &self.settings.thumbnail_profiles {
                    if let Some(url) =
                        Self::image_uri(prefix, scope, entity, *kind, &profile.query())
                    {
                        resources.push(Resource {
                            protocol_info: profile.protocol_info.clone(),
                            resolution: profile.report_resolution.clone(),
                            url,
                            ..Default::default()
                        });
                    }
                }
            }
        }
        resources
    }

    /// Une pochette (`upnp:albumArtURI`) par image et par préfixe, taille d'origine
    pub fn album_art(&self, scope: ImageScope, entity: &MediaEntity) -> Vec<AlbumArt> {
        entity
            .images
            .keys()
            .flat_map(|kind| {
                self.prefixes
                    .iter()
                    .filter_map(move |prefix| Self::image_uri(prefix, scope, entity, *kind, ""))
            })
            .map(|uri| AlbumArt {
                profile_id: None,
                uri,
            })
            .collect()
    }

    /// Préfixe utilisé pour l'icône : le premier dont l'hôte est en `192.`,
    /// sinon le premier
    pub fn icon_prefix(&self) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find(|prefix| {
                Url::parse(prefix)
                    .ok()
                    .and_then(|url| url.host_str().map(|h| h.starts_with("192.")))
                    .unwrap_or(false)
            })
            .or_else(|| self.prefixes.first())
            .map(String::as_str)
    }

    /// URI de l'icône, chaîne vide si aucune image ne convient
    pub fn icon_uri(&self, scope: ImageScope, entity: &MediaEntity) -> String {
        let Some(prefix) = self.icon_prefix() else {
            return String::new();
        };
        ICON_PRIORITY
            .iter()
            .find(|kind| entity.has_image(**kind))
            .and_then(|kind| Self::image_uri(prefix, scope, entity, *kind, ICON_QUERY))
            .unwrap_or_default()
    }
}
