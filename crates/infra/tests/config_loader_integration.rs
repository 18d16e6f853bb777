//! Integration tests for config loading and `${ENV}` substitution
//!
//! **Infrastructure:**
//! - Temporary config files (`tempfile`)
//! - A process-wide lock around environment mutation

use std::io::Write;
use std::sync::Mutex;

use aep_domain::constants::{HEADER_ORG_ID, HEADER_SANDBOX};
use aep_domain::AepError;
use aep_infra::config::{load_from_file, load_from_str, ConfigFormat};
use aep_infra::Platform;
use once_cell::sync::Lazy;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const TEMPLATE: &str = r#"
Enterprise:
  api_key: ${AEP_IT_API_KEY}
  org_id: ${AEP_IT_ORG_ID}
Platform:
  platform_gateway: ${AEP_IT_GATEWAY}
  ims_token: token-${AEP_IT_TOKEN_SUFFIX}
Titles:
  sandbox_name: ${AEP_IT_SANDBOX}
"#;

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn set_env(vars: &[(&str, &str)]) {
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
}

fn clear_env(keys: &[&str]) {
    for key in keys {
        std::env::remove_var(key);
    }
}

const KEYS: [&str; 5] =
    ["AEP_IT_API_KEY", "AEP_IT_ORG_ID", "AEP_IT_GATEWAY", "AEP_IT_TOKEN_SUFFIX", "AEP_IT_SANDBOX"];

// ============================================================================
// Environment Substitution
// ============================================================================

/// Scenario: set variables are substituted verbatim, unset ones become
/// their own name
#[test]
fn test_env_substitution_set_and_unset() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env(&KEYS);
    set_env(&[
        ("AEP_IT_API_KEY", "key with spaces & symbols: {x}"),
        ("AEP_IT_ORG_ID", "org@AdobeOrg"),
        ("AEP_IT_GATEWAY", "https://platform.adobe.io"),
        ("AEP_IT_TOKEN_SUFFIX", "abc"),
    ]);

    let file = yaml_file(TEMPLATE);
    let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

    assert_eq!(config.enterprise.api_key, "key with spaces & symbols: {x}");
    assert_eq!(config.enterprise.org_id, "org@AdobeOrg");
    assert_eq!(config.platform.ims_token.as_deref(), Some("token-abc"));
    assert_eq!(config.titles.sandbox_name, "AEP_IT_SANDBOX");

    clear_env(&KEYS);
}

/// Scenario: substituted values never change the document structure
#[test]
fn test_env_value_cannot_inject_yaml() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env(&KEYS);
    set_env(&[("AEP_IT_API_KEY", "key\n  org_id: injected"), ("AEP_IT_ORG_ID", "real")]);

    let config = load_from_str(TEMPLATE, ConfigFormat::Yaml).unwrap();
    assert_eq!(config.enterprise.api_key, "key\n  org_id: injected");
    assert_eq!(config.enterprise.org_id, "real");

    clear_env(&KEYS);
}

// ============================================================================
// Facade Construction
// ============================================================================

/// Scenario: a pre-issued token needs no network to build the facade
#[test]
fn test_platform_from_config_file() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env(&KEYS);
    set_env(&[
        ("AEP_IT_API_KEY", "key"),
        ("AEP_IT_ORG_ID", "org@AdobeOrg"),
        ("AEP_IT_GATEWAY", "https://platform.adobe.io"),
        ("AEP_IT_TOKEN_SUFFIX", "abc"),
        ("AEP_IT_SANDBOX", "dev"),
    ]);

    let file = yaml_file(TEMPLATE);
    let platform = Platform::from_config_file(file.path()).unwrap();

    let client = platform.client();
    assert!(client.registry().contains("schemaregistry.schema"));
    let headers = client.session().default_headers();
    assert_eq!(headers["Authorization"], "Bearer token-abc");
    assert_eq!(headers[HEADER_ORG_ID], "org@AdobeOrg");
    assert_eq!(headers[HEADER_SANDBOX], "dev");

    clear_env(&KEYS);
}

/// Scenario: an unknown gateway is rejected before any request
#[test]
fn test_platform_rejects_unknown_gateway() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    clear_env(&KEYS);
    set_env(&[("AEP_IT_GATEWAY", "https://elsewhere.example")]);

    let file = yaml_file(TEMPLATE);
    let result = Platform::from_config_file(file.path());
    assert!(matches!(result, Err(AepError::Config(_))));

    clear_env(&KEYS);
}
