#![cfg(feature = "pmoconfig")]

use pmocatalog::{CatalogConfigExt, CatalogError, CatalogSettings};
use pmoconfig::Config;
use tempfile::TempDir;

fn load(yaml: Option<&str>) -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    if let Some(yaml) = yaml {
        std::fs::write(dir.path().join("config.yaml"), yaml).unwrap();
    }
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    (dir, config)
}

#[test]
fn test_defaults() {
    let (_dir, config) = load(None);
    let settings = config.get_catalog_settings().unwrap();
    let defaults = CatalogSettings::default();

    assert!(!settings.url_prefixes.is_empty());
    assert!(settings
        .url_prefixes
        .iter()
        .all(|p| p.starts_with("http://") && p.ends_with(":8096/mediabrowser/")));
    assert_eq!(settings.static_extensions, defaults.static_extensions);
    assert_eq!(settings.transcode_extensions, defaults.transcode_extensions);
    assert_eq!(settings.thumbnail_profiles, defaults.thumbnail_profiles);
    assert_eq!(settings.audio_uri_template, "{0}Audio/{1}/stream.mp3");
    assert_eq!(settings.audio_mime_type, "audio/mpeg");
    assert_eq!(settings.custom_video, None);
}

#[test]
fn test_explicit_settings() {
    let (_dir, config) = load(Some(
        r#"
host:
  http_port: 9000
dlna:
  url_prefixes:
    - http://192.168.0.5:9000/mb
    - "not a url"
  video:
    static_extensions: ".mkv"
    transcode_extensions: "mp4"
    custom:
      extensions: "*"
      uri_template: "{0}Custom/{1}"
      protocol_info: "http-get:*:video/mp2t:*"
  audio:
    mime_type: "audio/flac"
  thumbnails:
    - mime_type: image/jpeg
      protocol_info: "http-get:*:image/jpeg:*"
      max_width: 320
      max_height: 240
"#,
    ));
    let settings = config.get_catalog_settings().unwrap();

    assert_eq!(settings.url_prefixes, vec!["http://192.168.0.5:9000/mb/"]);
    assert!(settings.static_extensions.contains(".MKV"));
    assert!(!settings.static_extensions.contains(".mp4"));
    assert!(settings.transcode_extensions.contains(".mp4"));
    assert!(!settings.transcode_extensions.contains(".mkv"));

    let custom = settings.custom_video.expect("custom resource");
    assert!(custom.extensions.is_wildcard());
    assert_eq!(custom.uri_template, "{0}Custom/{1}");

    assert_eq!(settings.audio_uri_template, "{0}Audio/{1}/stream.mp3");
    assert_eq!(settings.audio_mime_type, "audio/flac");

    assert_eq!(settings.thumbnail_profiles.len(), 1);
    assert_eq!(settings.thumbnail_profiles[0].query(), "?MaxHeight=240&MaxWidth=320");
    assert_eq!(settings.thumbnail_profiles[0].report_resolution, None);
}

#[test]
fn test_prefix_from_base_url() {
    let (_dir, config) = load(Some(
        r#"
host:
  base_url: mediaserver.local
  http_port: 8200
dlna:
  url_path: /dlna/
"#,
    ));
    assert_eq!(
        config.get_url_prefixes().unwrap(),
        vec!["http://mediaserver.local:8200/dlna/"]
    );
}

#[test]
fn test_incomplete_custom_resource_is_ignored() {
    let (_dir, config) = load(Some(
        r#"
dlna:
  video:
    custom:
      extensions: ".avi"
      uri_template: "{0}Custom/{1}"
"#,
    ));
    assert_eq!(config.get_custom_video_resource().unwrap(), None);
}

#[test]
fn test_set_url_prefixes_persists() {
    let (dir, config) = load(None);
    config
        .set_url_prefixes(vec!["http://10.0.0.7:8096/mediabrowser/".to_string()])
        .unwrap();
    assert_eq!(
        config.get_url_prefixes().unwrap(),
        vec!["http://10.0.0.7:8096/mediabrowser/"]
    );

    let reloaded = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(
        reloaded.get_url_prefixes().unwrap(),
        vec!["http://10.0.0.7:8096/mediabrowser/"]
    );
}

#[test]
fn test_invalid_thumbnails() {
    let (_dir, config) = load(Some(
        r#"
dlna:
  thumbnails: "large please"
"#,
    ));
    assert!(matches!(
        config.get_catalog_settings(),
        Err(CatalogError::InvalidSetting { ref key, .. }) if key == "dlna.thumbnails"
    ));
}

#[test]
fn test_log_directive_from_host_logger() {
    let (_dir, config) = load(None);
    assert_eq!(config.get_log_directive().unwrap().as_deref(), Some("info"));

    let (_dir, config) = load(Some(
        r#"
host:
  logger:
    min_level: DEBUG
"#,
    ));
    assert_eq!(config.get_log_directive().unwrap().as_deref(), Some("debug"));

    let (_dir, config) = load(Some(
        r#"
host:
  logger:
    enable_console: false
"#,
    ));
    assert_eq!(config.get_log_directive().unwrap(), None);
}
