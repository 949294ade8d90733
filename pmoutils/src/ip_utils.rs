use get_if_addrs::get_if_addrs;
use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Crée un socket UDP et le "connecte" vers `8.8.8.8:80` : aucun paquet n'est
/// émis, mais le système choisit l'interface qui servirait à joindre Internet.
///
/// # Returns
///
/// L'adresse IP locale sous forme de `String`, ou `"127.0.0.1"` en cas d'erreur.
///
/// # Examples
///
/// ```
/// let ip = pmoutils::guess_local_ip();
/// println!("IP locale détectée: {}", ip);
/// ```
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Liste les adresses IPv4 non-loopback de toutes les interfaces réseau.
///
/// Les adresses sont triées et dédoublonnées, pour que deux appels successifs
/// sur la même machine produisent la même liste (l'ordre des préfixes d'URL
/// en dépend).
///
/// Si l'énumération des interfaces échoue, la liste est vide.
///
/// # Examples
///
/// ```
/// for ip in pmoutils::list_local_ipv4() {
///     println!("{}", ip);
/// }
/// ```
pub fn list_local_ipv4() -> Vec<String> {
    let mut result: Vec<String> = match get_if_addrs() {
        Ok(interfaces) => interfaces
            .into_iter()
            .map(|iface| iface.ip())
            .filter(|ip| ip.is_ipv4() && !ip.is_loopback())
            .map(|ip| ip.to_string())
            .collect(),
        Err(_) => Vec::new(),
    };

    result.sort();
    result.dedup();
    result
}

/// Construit une URL de base `http://{host}:{port}/{path}/`.
///
/// Le chemin est normalisé : les `/` superflus en tête et en fin sont retirés
/// puis un unique `/` final est ajouté. Un chemin vide donne `http://host:port/`.
pub fn http_base_url(host: &str, port: u16, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("http://{}:{}/", host, port)
    } else {
        format!("http://{}:{}/{}/", host, port, path)
    }
}

/// Construit une URL de base pour chaque adresse IPv4 locale.
///
/// Si aucune interface n'est trouvée, on retombe sur [`guess_local_ip`].
pub fn http_base_urls(port: u16, path: &str) -> Vec<String> {
    let mut hosts = list_local_ipv4();
    if hosts.is_empty() {
        hosts.push(guess_local_ip());
    }
    hosts
        .iter()
        .map(|host| http_base_url(host, port, path))
        .collect()
}
