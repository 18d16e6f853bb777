//! Session authentication
//!
//! Builds the gateway-specific header set from a bearer token, and obtains
//! that token either from the config (`Platform.ims_token`) or from the IMS
//! JWT exchange. Signing the JWT assertion is left to the caller; the
//! exchange only accepts an already signed `Enterprise.jwt_token`.

use aep_core::response::classify;
use aep_domain::constants::{
    BEARER_PREFIX, HEADER_API_KEY, HEADER_AUTHORIZATION, HEADER_ORG_ID, HEADER_SANDBOX,
};
use aep_domain::utils::json_path::lookup_str;
use aep_domain::{AepError, Gateway, HeaderMapping, HttpMethod, PlatformConfig, Result};
use tracing::{debug, info};

use crate::errors::InfraError;
use crate::http::HttpSession;

const ACCESS_TOKEN_FIELD: &str = "access_token";

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
pub trait AccessTokenProvider {
    /// Get a token suitable for the `Authorization` header.
    fn access_token(&self) -> Result<String>;
}

/// A token issued out of band
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AccessTokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Result<String> {
        Ok(bearer(&self.token))
    }
}

/// Exchange of a signed JWT assertion for an access token
pub struct ImsTokenExchange {
    session: HttpSession,
    exchange_url: String,
    client_id: String,
    client_secret: String,
    jwt_token: String,
}

impl ImsTokenExchange {
    pub fn new(
        session: HttpSession,
        exchange_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        jwt_token: impl Into<String>,
    ) -> Self {
        Self {
            session,
            exchange_url: exchange_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            jwt_token: jwt_token.into(),
        }
    }
}

impl AccessTokenProvider for ImsTokenExchange {
    fn access_token(&self) -> Result<String> {
        debug!(url = %self.exchange_url, "exchanging JWT for an access token");
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("jwt_token", self.jwt_token.as_str()),
        ];
        let builder = self
            .session
            .request(HttpMethod::Post, self.exchange_url.as_str())
            .header("Cache-Control", "no-cache")
            .form(&form);

        let response = self.session.send(builder)?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|err| AepError::from(InfraError::from(err)))?;

        let parsed = classify(status, &self.exchange_url, &text).map_err(|err| {
            AepError::Auth(format!("IMS token exchange failed: {err}"))
        })?;
        let token = lookup_str(&parsed.body, ACCESS_TOKEN_FIELD).ok_or_else(|| {
            AepError::Auth(format!("IMS response has no '{ACCESS_TOKEN_FIELD}'"))
        })?;

        info!("obtained access token from IMS");
        Ok(bearer(token))
    }
}

/// Pick the token source the config supports.
///
/// A pre-issued `ims_token` wins. Otherwise the IMS exchange is used, which
/// needs the `Server` section, `client_secret` and a signed `jwt_token`.
pub fn token_provider_from_config(
    config: &PlatformConfig,
    session: &HttpSession,
) -> Result<Box<dyn AccessTokenProvider>> {
    if let Some(token) = config.platform.issued_token() {
        return Ok(Box::new(StaticTokenProvider::new(token)));
    }

    let enterprise = &config.enterprise;
    match (&config.server, &enterprise.client_secret, &enterprise.jwt_token) {
        (Some(server), Some(secret), Some(jwt)) => Ok(Box::new(ImsTokenExchange::new(
            session.clone(),
            server.exchange_url(),
            enterprise.api_key.clone(),
            secret.clone(),
            jwt.clone(),
        ))),
        _ => Err(AepError::Config(
            "no ims_token configured; the IMS exchange needs Server, client_secret and jwt_token"
                .to_string(),
        )),
    }
}

/// Prefix a token with `Bearer ` unless it already carries it.
pub fn bearer(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{BEARER_PREFIX}{token}")
    }
}

/// Default session headers for the configured gateway.
pub fn auth_headers(config: &PlatformConfig, token: &str) -> Result<HeaderMapping> {
    let gateway = Gateway::from_url(&config.platform.platform_gateway)?;
    let mut headers = HeaderMapping::new();
    headers.insert(HEADER_AUTHORIZATION.to_string(), bearer(token));
    headers.insert(HEADER_API_KEY.to_string(), config.enterprise.api_key.clone());

    if gateway == Gateway::Experience {
        headers.insert(HEADER_ORG_ID.to_string(), config.enterprise.org_id.clone());
        headers.insert(HEADER_SANDBOX.to_string(), config.titles.sandbox_name.clone());
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(gateway: &str) -> PlatformConfig {
        serde_json::from_value(json!({
            "Enterprise": { "api_key": "key", "org_id": "org@AdobeOrg" },
            "Platform": { "platform_gateway": gateway, "ims_token": "abc" },
            "Titles": { "sandbox_name": "dev" }
        }))
        .unwrap()
    }

    #[test]
    fn test_bearer_prefix_is_added_once() {
        assert_eq!(bearer("abc"), "Bearer abc");
        assert_eq!(bearer("Bearer abc"), "Bearer abc");
    }

    #[test]
    fn test_experience_gateway_headers() {
        let headers = auth_headers(&config("https://platform.adobe.io"), "abc").unwrap();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[HEADER_AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[HEADER_API_KEY], "key");
        assert_eq!(headers[HEADER_ORG_ID], "org@AdobeOrg");
        assert_eq!(headers[HEADER_SANDBOX], "dev");
    }

    #[test]
    fn test_campaign_gateway_headers() {
        let headers = auth_headers(&config("https://mc.adobe.io"), "abc").unwrap();
        assert_eq!(headers.len(), 2);
        assert!(!headers.contains_key(HEADER_ORG_ID));
    }

    #[test]
    fn test_unknown_gateway_is_config_error() {
        let err = auth_headers(&config("https://elsewhere.example"), "abc").unwrap_err();
        assert!(matches!(err, AepError::Config(_)));
    }

    #[test]
    fn test_issued_token_selects_static_provider() {
        let session = HttpSession::new().unwrap();
        let provider = token_provider_from_config(&config("https://platform.adobe.io"), &session)
            .unwrap();
        assert_eq!(provider.access_token().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_placeholder_without_exchange_settings_fails() {
        let mut config = config("https://platform.adobe.io");
        config.platform.ims_token = Some("<ims_token>".into());
        let session = HttpSession::new().unwrap();
        let err = token_provider_from_config(&config, &session).err().unwrap();
        assert!(matches!(err, AepError::Config(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ims_exchange_posts_form_and_reads_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ims/exchange/jwt/"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("jwt_token=signed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "bearer",
                "access_token": "fresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/ims/exchange/jwt/", server.uri());
        let token = tokio::task::spawn_blocking(move || {
            let exchange =
                ImsTokenExchange::new(HttpSession::new().unwrap(), url, "key", "secret", "signed");
            exchange.access_token()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(token, "Bearer fresh");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ims_exchange_rejection_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let url = server.uri();
        let err = tokio::task::spawn_blocking(move || {
            ImsTokenExchange::new(HttpSession::new().unwrap(), url, "key", "secret", "signed")
                .access_token()
        })
        .await
        .unwrap()
        .unwrap_err();

        match err {
            AepError::Auth(msg) => assert!(msg.contains("invalid_client")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }
}
