use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToggleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("invalid resolver entry: {0}")]
    InvalidEntry(String),

    #[error("position {position} out of range (list has {len} entries)")]
    OutOfRange { position: usize, len: usize },

    #[error("lock poisoned: {0}")]
    Poisoned(&'static str),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ToggleError {
    /// Get the kind/category of this error.
    pub fn kind(&self) -> ToggleErrorKind {
        match self {
            ToggleError::Io(_) => ToggleErrorKind::Io,
            ToggleError::Format(_) => ToggleErrorKind::Format,
            ToggleError::InvalidEntry(_) => ToggleErrorKind::InvalidEntry,
            ToggleError::OutOfRange { .. } => ToggleErrorKind::OutOfRange,
            ToggleError::Poisoned(_) => ToggleErrorKind::Poisoned,
            ToggleError::Other(_) => ToggleErrorKind::Other,
        }
    }

    /// 用户输入错误（编辑列表时），可直接回显给用户
    pub fn is_user_error(&self) -> bool {
        self.kind().is_user_error()
    }
}

/// Lightweight error category for pattern matching without borrowing the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleErrorKind {
    Io,
    Format,
    InvalidEntry,
    OutOfRange,
    Poisoned,
    Other,
}

impl ToggleErrorKind {
    pub fn is_user_error(self) -> bool {
        matches!(
            self,
            ToggleErrorKind::InvalidEntry | ToggleErrorKind::OutOfRange
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToggleErrorKind::Io => "IO",
            ToggleErrorKind::Format => "FORMAT",
            ToggleErrorKind::InvalidEntry => "INVALID_ENTRY",
            ToggleErrorKind::OutOfRange => "OUT_OF_RANGE",
            ToggleErrorKind::Poisoned => "POISONED",
            ToggleErrorKind::Other => "OTHER",
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ToggleError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ToggleError::Poisoned("store")
    }
}

pub type Result<T, E = ToggleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        let e = ToggleError::InvalidEntry("a,b".into());
        assert!(e.is_user_error());
        let e = ToggleError::OutOfRange { position: 3, len: 1 };
        assert!(e.is_user_error());
        assert_eq!(e.kind().as_str(), "OUT_OF_RANGE");
        let e = ToggleError::Poisoned("store");
        assert!(!e.is_user_error());
    }

    #[test]
    fn out_of_range_message() {
        let e = ToggleError::OutOfRange { position: 5, len: 2 };
        assert_eq!(e.to_string(), "position 5 out of range (list has 2 entries)");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: ToggleError = io.into();
        assert_eq!(e.kind(), ToggleErrorKind::Io);
    }
}
