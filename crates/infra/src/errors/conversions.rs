//! Conversions from external infrastructure errors into domain errors.

use aep_domain::AepError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AepError);

impl From<InfraError> for AepError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AepError> for InfraError {
    fn from(value: AepError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAepError {
    fn into_aep(self) -> AepError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AepError */
/* -------------------------------------------------------------------------- */

impl IntoAepError for HttpError {
    fn into_aep(self) -> AepError {
        if self.is_timeout() {
            return AepError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AepError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return AepError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return AepError::Transport(format!("failed to read response body: {self}"));
        }

        AepError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_aep())
    }
}

/* -------------------------------------------------------------------------- */
/* Document parsers → AepError */
/* -------------------------------------------------------------------------- */

impl IntoAepError for YamlError {
    fn into_aep(self) -> AepError {
        match self.location() {
            Some(location) => AepError::Config(format!(
                "Invalid YAML format at line {} column {}: {self}",
                location.line(),
                location.column()
            )),
            None => AepError::Config(format!("Invalid YAML format: {self}")),
        }
    }
}

impl From<YamlError> for InfraError {
    fn from(value: YamlError) -> Self {
        InfraError(value.into_aep())
    }
}

impl IntoAepError for TomlError {
    fn into_aep(self) -> AepError {
        AepError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_aep())
    }
}

impl IntoAepError for JsonError {
    fn into_aep(self) -> AepError {
        AepError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_aep())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → AepError */
/* -------------------------------------------------------------------------- */

impl IntoAepError for std::io::Error {
    fn into_aep(self) -> AepError {
        match self.kind() {
            std::io::ErrorKind::NotFound => AepError::Config(format!("file not found: {self}")),
            _ => AepError::Config(format!("failed to read file: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_aep())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
