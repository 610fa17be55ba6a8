//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

#[fixture]
fn valid_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_defaults(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(valid_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.remove(missing);

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected a missing toggle to fail",
    );
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(valid_key: NamedTempFile, #[case] value: &str) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_ephemeral_enabled_is_rejected(valid_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected ephemeral to be rejected in release",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_key_file_is_rejected() {
    let mut vars = release_defaults("/nonexistent/session_key".to_owned());
    vars.insert(ALLOW_EPHEMERAL_ENV, "0".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected missing key file to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_short_key_is_rejected() {
    let short = key_file(32);
    let err = expect_error(
        session_settings_from_env(&mock_env(release_defaults(path_of(&short))), BuildMode::Release),
        "expected short key to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyTooShort { length: 32, .. }));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(valid_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_valid_settings_use_one_hour_sessions(valid_key: NamedTempFile) {
    let env = mock_env(release_defaults(path_of(&valid_key)));

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, Duration::hours(1));
}

#[rstest]
#[case("7200", Some(Duration::hours(2)))]
#[case("30", None)]
#[case("soon", None)]
fn ttl_override_is_validated(
    valid_key: NamedTempFile,
    #[case] value: &str,
    #[case] expected: Option<Duration>,
) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.insert(TTL_ENV, value.to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);
    match expected {
        Some(ttl) => assert_eq!(result.expect("valid ttl").ttl, ttl),
        None => assert!(matches!(
            result,
            Err(SessionConfigError::InvalidEnv { name: TTL_ENV, .. })
        )),
    }
}

#[rstest]
fn debug_defaults_allow_ephemeral_key() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, Duration::hours(1));
}

#[rstest]
fn debug_invalid_values_fall_back_to_defaults(valid_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&valid_key));
    vars.insert(SAMESITE_ENV, "unexpected".to_owned());
    vars.insert(TTL_ENV, "-5".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, Duration::hours(1));
}
