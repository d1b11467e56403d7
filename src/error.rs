//! error types
//!
//! structured errors for configuration and code generation. generation has no
//! partial-failure mode: any error aborts the run and names the offending
//! construct so the schema or document can be corrected.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the generator and codegen helpers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type {type_name} referenced by field {field_name}")]
    UnknownType {
        /// named type missing from the schema catalog
        type_name: String,
        /// field or variable whose type referenced it
        field_name: String,
    },

    #[error("unknown field {field_name} on type {type_name}")]
    UnknownField {
        /// type the selection was resolved against
        type_name: String,
        /// selected field
        field_name: String,
    },

    #[error("unknown fragment {name}")]
    UnknownFragment {
        /// spread fragment with no matching definition
        name: String,
    },

    #[error("field {field_name} on type {type_name} does not support sub-selections")]
    InvalidSelection {
        /// base type of the selected field
        type_name: String,
        /// field carrying the sub-selection
        field_name: String,
    },

    #[error("unbalanced composite emission in operation {operation}")]
    Unbalanced {
        /// operation whose traversal left an open composite
        operation: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_name_the_offending_construct() {
        let err = Error::UnknownType {
            type_name: "Widget".to_string(),
            field_name: "widget".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Widget"));
        assert!(message.contains("widget"));

        let err = Error::UnknownField {
            type_name: "Query".to_string(),
            field_name: "missing".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Query"));
        assert!(message.contains("missing"));

        let err = Error::UnknownFragment {
            name: "UserParts".to_string(),
        };
        assert!(err.to_string().contains("UserParts"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(parse_err);
        assert!(matches!(err, Error::Json(_)));
    }
}
