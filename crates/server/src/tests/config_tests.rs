use super::{parse_bind_addr, settings_from_sources, Settings};

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(settings_from_sources(None, env_from(&[])), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
bind_addr = "0.0.0.0:9000"
seed_catalog = "false"
body_limit_bytes = "1024"
"#;
    let settings = settings_from_sources(Some(raw), env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert!(!settings.seed_catalog);
    assert_eq!(settings.body_limit_bytes, 1024);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let raw = r#"bind_addr = "0.0.0.0:9000""#;
    let settings = settings_from_sources(
        Some(raw),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:4000"),
            ("APP__BIND_ADDR", "127.0.0.1:5000"),
            ("APP__SEED_CATALOG", "no"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert!(!settings.seed_catalog);
}

#[test]
fn unparseable_values_keep_previous_setting() {
    let settings = settings_from_sources(
        Some("not toml at all ="),
        env_from(&[
            ("APP__SEED_CATALOG", "maybe"),
            ("APP__BODY_LIMIT_BYTES", "lots"),
        ]),
    );
    assert_eq!(settings, Settings::default());
}

#[test]
fn bind_addr_errors_name_the_bad_value() {
    assert!(parse_bind_addr("127.0.0.1:3000").is_ok());
    let err = parse_bind_addr("localhost").expect_err("should fail");
    assert!(err.to_string().contains("localhost"));
}
