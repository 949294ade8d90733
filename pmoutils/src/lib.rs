/// Utilitaires pour la gestion des adresses IP réseau.
///
/// Ce module fournit des fonctions pour détecter et lister les adresses IP
/// des interfaces réseau locales de la machine, et pour en déduire les URLs
/// de base sous lesquelles le serveur média est joignable.
///
/// # Fonctions principales
///
/// - [`guess_local_ip`] : Devine l'adresse IP locale utilisée pour les connexions sortantes
/// - [`list_local_ipv4`] : Liste les adresses IPv4 non-loopback de la machine
/// - [`http_base_urls`] : Construit une URL de base par adresse locale
///
/// # Examples
///
/// ```
/// use pmoutils::guess_local_ip;
///
/// let ip = guess_local_ip();
/// println!("Adresse IP locale: {}", ip);
/// ```
mod ip_utils;

pub use ip_utils::{guess_local_ip, http_base_url, http_base_urls, list_local_ipv4};
