//! Opaque-failure result for the facade operations that swallow SDK errors.

/// Result of an operation whose failures carry no detail.
///
/// `Failed` means "the operation did not succeed". Callers must not try to
/// distinguish why; the cause is deliberately discarded.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed. No further detail is available.
    Failed,
}

impl<T> Outcome<T> {
    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the operation failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// The success value, if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(_) => Self::Failed,
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result_discards_error() {
        let ok: Outcome<u8> = Ok::<_, String>(1).into();
        let failed: Outcome<u8> = Err::<u8, _>("detail".to_string()).into();
        assert_eq!(ok, Outcome::Success(1));
        assert_eq!(failed, Outcome::Failed);
    }

    #[test]
    fn accessors() {
        let ok = Outcome::Success("t");
        assert!(ok.is_success());
        assert!(!ok.is_failed());
        assert_eq!(ok.into_option(), Some("t"));

        let failed: Outcome<&str> = Outcome::Failed;
        assert!(failed.is_failed());
        let none: Option<&str> = failed.into();
        assert_eq!(none, None);
    }
}
