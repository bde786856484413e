use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_suparank_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SUPARANK_API_URL");
        env::remove_var("SUPARANK_REQUEST_TIMEOUT_SECS");
        env::remove_var("SUPARANK_RESET_MAX_ATTEMPTS");
        env::remove_var("SUPARANK_RESET_BACKOFF_MS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.api_url, "http://localhost:8000/api");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.reset_max_attempts, 3);
    assert_eq!(config.reset_backoff, Duration::from_millis(500));
}

#[test]
fn test_reset_policy_from_config() {
    let config = Config {
        reset_max_attempts: 5,
        reset_backoff: Duration::from_millis(20),
        ..Default::default()
    };

    let policy = config.reset_policy();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.backoff, Duration::from_millis(20));
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_suparank_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_suparank_env();

    let config = with_env_vars(
        &[
            ("SUPARANK_API_URL", "https://rank.example.com/api/"),
            ("SUPARANK_REQUEST_TIMEOUT_SECS", "3"),
            ("SUPARANK_RESET_MAX_ATTEMPTS", "7"),
            ("SUPARANK_RESET_BACKOFF_MS", "0"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.api_url, "https://rank.example.com/api");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.reset_max_attempts, 7);
    assert!(config.reset_backoff.is_zero());
}

#[test]
#[serial]
fn test_from_env_blank_values_use_defaults() {
    clear_suparank_env();

    let config = with_env_vars(
        &[("SUPARANK_API_URL", "  "), ("SUPARANK_RESET_BACKOFF_MS", "")],
        Config::from_env,
    )
    .expect("blank values fall back");

    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_number() {
    clear_suparank_env();

    let result = with_env_vars(
        &[("SUPARANK_REQUEST_TIMEOUT_SECS", "ten")],
        Config::from_env,
    );

    assert_eq!(
        result,
        Err(ConfigError::InvalidNumber {
            name: "SUPARANK_REQUEST_TIMEOUT_SECS",
            value: "ten".to_string(),
        })
    );
}

#[test]
#[serial]
fn test_from_env_rejects_negative_backoff() {
    clear_suparank_env();

    let result = with_env_vars(&[("SUPARANK_RESET_BACKOFF_MS", "-5")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })));
}

#[test]
#[serial]
fn test_from_env_rejects_zero_attempts() {
    clear_suparank_env();

    let result = with_env_vars(&[("SUPARANK_RESET_MAX_ATTEMPTS", "0")], Config::from_env);

    assert_eq!(result, Err(ConfigError::InvalidAttempts));
}

#[test]
#[serial]
fn test_from_env_rejects_zero_timeout() {
    clear_suparank_env();

    let result = with_env_vars(
        &[("SUPARANK_REQUEST_TIMEOUT_SECS", "0")],
        Config::from_env,
    );

    assert_eq!(result, Err(ConfigError::InvalidTimeout));
}

#[test]
#[serial]
fn test_from_env_rejects_url_without_scheme() {
    clear_suparank_env();

    let result = with_env_vars(&[("SUPARANK_API_URL", "localhost:8000/api")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
}

#[test]
fn test_with_api_url_overrides_and_validates() {
    let config = Config::default()
        .with_api_url("http://10.0.0.5:9000/api//")
        .expect("valid url");
    assert_eq!(config.api_url, "http://10.0.0.5:9000/api");

    let err = Config::default().with_api_url("ftp://files").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid API URL 'ftp://files': expected http:// or https://"
    );

    assert!(Config::default().with_api_url("http://").is_err());
}
