//! Engine error types.
//!
//! Every variant is a construction-time failure: bad dimensions, bad speeds,
//! unreadable settings or a control id outside the known set. Per-frame
//! physics never fails once an engine has been built.

use std::fmt;

/// Top-level error enum for the engine.
#[derive(Debug)]
pub enum EngineError {
    /// Paddle width or height was negative (or not finite).
    InvalidPaddleSize { width: f32, height: f32 },

    /// Ball speed was negative (or not finite).
    NegativeBallSpeed { speed: f32 },

    /// Ball radius must be strictly positive.
    InvalidBallRadius { radius: f32 },

    /// Brick cells must have a positive size.
    InvalidBrickSize { width: f32, height: f32 },

    /// A settings field is outside its valid range.
    InvalidSettings {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable description of the valid range.
        reason: &'static str,
    },

    /// A raw control class that maps to no paddle direction.
    UnknownControlClass(u8),

    /// JSON could not be parsed or written.
    Json(serde_json::Error),

    /// A settings file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPaddleSize { width, height } => write!(
                f,
                "paddle width and height must be positive (got {width} x {height})"
            ),
            EngineError::NegativeBallSpeed { speed } => {
                write!(f, "ball speed must not be negative (got {speed})")
            }
            EngineError::InvalidBallRadius { radius } => {
                write!(f, "ball radius must be positive (got {radius})")
            }
            EngineError::InvalidBrickSize { width, height } => write!(
                f,
                "brick width and height must be positive (got {width} x {height})"
            ),
            EngineError::InvalidSettings { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
            EngineError::UnknownControlClass(class) => {
                write!(f, "unknown control class {class} (expected 0 = left, 1 = right)")
            }
            EngineError::Json(err) => write!(f, "JSON error: {err}"),
            EngineError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Json(err) => Some(err),
            EngineError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Json(err)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_mentions_values() {
        let err = EngineError::InvalidPaddleSize {
            width: -1.0,
            height: 10.0,
        };
        assert!(err.to_string().contains("-1"));

        let err = EngineError::UnknownControlClass(7);
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_parse_error_has_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = EngineError::from(parse);
        assert!(err.source().is_some());
        assert!(EngineError::NegativeBallSpeed { speed: -1.0 }.source().is_none());
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::fs::read_to_string("/nonexistent/brick-breaker/settings.json").unwrap_err();
        let kind = io.kind();
        let err = EngineError::from(io);
        assert!(err.to_string().starts_with("I/O error"));
        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<std::io::Error>().map(|e| e.kind()),
            Some(kind)
        );
    }
}
