//! Error types for Starfall

use thiserror::Error;

/// The main error type for Starfall operations
#[derive(Debug, Error)]
pub enum StarfallError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Animation error: {0}")]
    AnimationError(String),

    #[error("Particle error: {0}")]
    ParticleError(String),

    #[error("Collision error: {0}")]
    CollisionError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Starfall operations
pub type Result<T> = std::result::Result<T, StarfallError>;

impl From<toml::de::Error> for StarfallError {
    fn from(err: toml::de::Error) -> Self {
        StarfallError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: StarfallError = toml::from_str::<toml::Value>("= nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, StarfallError::TomlParseError(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn node_not_found_message() {
        let err = StarfallError::NodeNotFound("#7".into());
        assert_eq!(err.to_string(), "Node not found: #7");
    }
}
