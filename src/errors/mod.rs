//! Domain error types
//!
//! `DirectoryError` covers every failure the directory services can report:
//! missing entities, rejected input, uniqueness/reference conflicts and
//! storage failures. With the `graphql` feature enabled it converts into
//! GraphQL errors carrying a `code` extension via `ToGraphQLError`.

pub mod common;
pub mod directory;

pub use directory::DirectoryError;

#[cfg(feature = "graphql")]
pub use common::{ResultExt, ToGraphQLError};

/// Result type alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_result_alias() {
        let result: DirectoryResult<()> = Err(DirectoryError::Conflict("dup".to_string()));
        assert!(result.is_err());
    }
}
