#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("key not found")]
    NotFound,
    /// The value does not fit the lookup scratch buffer.
    #[error("value truncated")]
    Truncated,
}

#[cfg(test)]
mod tests {
    use crate::error::*;

    #[test]
    fn test_error() {
        assert_eq!(LookupError::NotFound.to_string(), "key not found");
        assert_eq!(LookupError::Truncated.to_string(), "value truncated");
    }
}
