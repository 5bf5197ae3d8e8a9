use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Unsupported,
    Io,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Io,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for EngineError {}

#[derive(Debug)]
pub enum LampError {
    String(String),
    Io(std::io::Error),
    Serde(serde_json::Error),
    Csv(csv::Error),
    Engine(EngineError),
}

impl Error for LampError {}

impl fmt::Display for LampError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Io(e) => write!(f, "{e}"),
            Self::Serde(e) => write!(f, "{e}"),
            Self::Csv(e) => write!(f, "{e}"),
            Self::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl From<String> for LampError {
    fn from(err: String) -> Self {
        LampError::String(err)
    }
}

impl From<std::io::Error> for LampError {
    fn from(err: std::io::Error) -> Self {
        LampError::Io(err)
    }
}

impl From<serde_json::Error> for LampError {
    fn from(err: serde_json::Error) -> Self {
        LampError::Serde(err)
    }
}

impl From<csv::Error> for LampError {
    fn from(err: csv::Error) -> Self {
        LampError::Csv(err)
    }
}

impl From<EngineError> for LampError {
    fn from(err: EngineError) -> Self {
        LampError::Engine(err)
    }
}

impl From<LampError> for EngineError {
    fn from(err: LampError) -> Self {
        match err {
            LampError::Engine(e) => e,
            LampError::Io(e) => EngineError::io(e.to_string()),
            other => EngineError {
                code: ErrorCode::Internal,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::invalid_input("end 3 is before start 7");
        assert_eq!(err.to_string(), "InvalidInput: end 3 is before start 7");
    }

    #[test]
    fn test_lamp_error_into_engine_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = LampError::from(io).into();
        assert_eq!(err.code, ErrorCode::Io);

        let err: EngineError = LampError::from("boom".to_string()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "boom");
    }
}
