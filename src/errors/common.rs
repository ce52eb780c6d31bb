//! GraphQL conversion for directory errors

#[cfg(feature = "graphql")]
use async_graphql::{Error as GraphQLError, ErrorExtensions};

#[cfg(feature = "graphql")]
use super::DirectoryError;

/// Convert domain errors to GraphQL errors with error codes
#[cfg(feature = "graphql")]
pub trait ToGraphQLError {
    fn to_graphql_error(&self) -> GraphQLError;
}

#[cfg(feature = "graphql")]
impl ToGraphQLError for DirectoryError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.error_code();
        let message = self.to_string();

        GraphQLError::new(message).extend_with(|_, e| {
            e.set("code", code);
            e.set("statusCode", self.http_status_code());

            match self {
                DirectoryError::NotFound { entity, id } => {
                    e.set("entity", *entity);
                    e.set("id", *id);
                }
                DirectoryError::Validation { field, .. } => {
                    e.set("field", field.as_str());
                }
                _ => {}
            }
        })
    }
}

/// Extension trait for Result<T, DirectoryError> to convert errors to GraphQL errors
#[cfg(feature = "graphql")]
pub trait ResultExt<T> {
    fn to_graphql_result(self) -> Result<T, GraphQLError>;
}

#[cfg(feature = "graphql")]
impl<T> ResultExt<T> for Result<T, DirectoryError> {
    fn to_graphql_result(self) -> Result<T, GraphQLError> {
        self.map_err(|e| e.to_graphql_error())
    }
}

#[cfg(all(test, feature = "graphql"))]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_to_graphql() {
        let err = DirectoryError::not_found("restaurant", 3);
        let graphql_err = err.to_graphql_error();

        assert!(graphql_err.message.contains("restaurant 3 not found"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, DirectoryError> =
            Err(DirectoryError::validation("score", "must be positive"));
        assert!(result.to_graphql_result().is_err());
    }
}
