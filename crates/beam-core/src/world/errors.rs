//! Error types and fatal invariant reporting

use thiserror::Error;

/// Recoverable errors surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeamError {
    #[error("unknown zap: {0}")]
    UnknownZap(String),

    #[error("invalid beam options: {0}")]
    InvalidOptions(String),

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BeamError {
    fn from(err: std::io::Error) -> Self {
        BeamError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BeamError {
    fn from(err: serde_json::Error) -> Self {
        BeamError::InvalidOptions(err.to_string())
    }
}

/// Report a caller programming error and stop.
///
/// Used for broken bolt configuration: continuing would silently produce
/// wrong combat results.
#[track_caller]
pub fn config_bug(message: &str) -> ! {
    tracing::error!(target: "beam", "{message}");
    panic!("beam configuration bug: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BeamError::UnknownZap("bolt of nothing".into());
        assert_eq!(err.to_string(), "unknown zap: bolt of nothing");
    }

    #[test]
    fn test_json_error_converts() {
        let bad = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(BeamError::from(bad), BeamError::InvalidOptions(_)));
    }

    #[test]
    #[should_panic(expected = "beam configuration bug")]
    fn test_config_bug_panics() {
        config_bug("negative range");
    }
}
