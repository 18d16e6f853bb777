use aep_core::EndpointRegistry;
use aep_domain::PlatformConfig;
use aep_infra::{auth_headers, HttpSession, PlatformClient, RegistryLoader};
use serde_json::json;

pub const TOKEN: &str = "test-token";
pub const API_KEY: &str = "test-key";
pub const ORG_ID: &str = "org@AdobeOrg";
pub const SANDBOX: &str = "dev";

/// Experience-gateway config with a pre-issued token.
pub fn config() -> PlatformConfig {
    serde_json::from_value(json!({
        "Enterprise": { "api_key": API_KEY, "org_id": ORG_ID },
        "Platform": { "platform_gateway": "https://platform.adobe.io", "ims_token": TOKEN },
        "Titles": { "sandbox_name": SANDBOX },
        "Http": { "timeout_secs": 5 }
    }))
    .expect("test config should deserialize")
}

/// Bundled endpoint table rooted at the mock server.
pub fn registry(uri: &str) -> EndpointRegistry {
    RegistryLoader::new().gateway(uri).load().expect("bundled registry should load")
}

/// Client with the auth headers of [`config`].
pub fn client_with_registry(registry: EndpointRegistry) -> PlatformClient {
    let headers = auth_headers(&config(), TOKEN).expect("auth headers");
    let session = HttpSession::builder().default_headers(headers).build().expect("http session");
    PlatformClient::new(session, registry)
}

pub fn client(uri: &str) -> PlatformClient {
    client_with_registry(registry(uri))
}

/// Run blocking client code off the async test runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
}
