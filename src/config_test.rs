use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

fn home(path: &str) -> impl FnOnce() -> Option<PathBuf> {
    let path = PathBuf::from(path);
    move || Some(path)
}

#[test]
fn from_vars_uses_defaults() {
    let cfg = ClientConfig::resolve(lookup_from(&[]), home("/home/ana")).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.api_base(), "http://localhost:8000/api/v1");
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.session_dir, PathBuf::from("/home/ana/.taskdesk"));
}

#[test]
fn from_vars_parses_overrides() {
    let cfg = ClientConfig::from_vars(lookup_from(&[
        ("TASKDESK_API_URL", "https://tasks.example.test/"),
        ("TASKDESK_REQUEST_TIMEOUT_SECS", "42"),
        ("TASKDESK_CONNECT_TIMEOUT_SECS", " 7 "),
        ("TASKDESK_SESSION_DIR", "/tmp/td"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://tasks.example.test");
    assert_eq!(cfg.api_base(), "https://tasks.example.test/api/v1");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.timeouts.request(), Duration::from_secs(42));
    assert_eq!(cfg.session_dir, PathBuf::from("/tmp/td"));
}

#[test]
fn from_vars_rejects_non_http_url() {
    let err = ClientConfig::from_vars(lookup_from(&[("TASKDESK_API_URL", "ftp://nope")])).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn from_vars_rejects_zero_timeout() {
    let err = ClientConfig::from_vars(lookup_from(&[("TASKDESK_REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
    assert!(err.to_string().contains("TASKDESK_REQUEST_TIMEOUT_SECS"));
}

#[test]
fn missing_home_without_override_is_an_error() {
    let err = ClientConfig::resolve(lookup_from(&[]), || None).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert!(err.to_string().contains("TASKDESK_SESSION_DIR"));
}

#[test]
fn session_dir_override_skips_home_lookup() {
    let cfg = ClientConfig::resolve(lookup_from(&[("TASKDESK_SESSION_DIR", "/srv/td")]), || None).unwrap();
    assert_eq!(cfg.session_dir, PathBuf::from("/srv/td"));
}

#[test]
fn home_env_var_is_not_consulted() {
    let cfg = ClientConfig::resolve(lookup_from(&[("HOME", "/elsewhere")]), home("/home/ana")).unwrap();
    assert_eq!(cfg.session_dir, PathBuf::from("/home/ana/.taskdesk"));
}
