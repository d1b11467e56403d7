//! generator configuration
//!
//! build a [`Config`] with the target go package name and pass it to
//! [`crate::Generator::new`]. the on-disk [`Manifest`] holds the same
//! settings plus file locations for the `gqlgo-codegen` binary.

use crate::error::{Error, Result};
use crate::naming::is_go_keyword;
use serde::{Deserialize, Serialize};

/// fallback go package name when none is configured
pub const DEFAULT_PACKAGE: &str = "graphql";

/// configuration for a generation run
#[derive(Debug, Clone)]
pub struct Config {
    /// go package name emitted in the header
    pub(crate) package: String,
}

impl Config {
    /// create a configuration with the default package name
    pub fn new() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
        }
    }

    /// set the go package name for the generated file
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// access the configured package name
    pub fn package(&self) -> &str {
        &self.package
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !is_go_identifier(&self.package) {
            return Err(Error::Config(format!(
                "invalid go package name: {}",
                self.package
            )));
        }
        if is_go_keyword(&self.package) {
            return Err(Error::Config(format!(
                "go package name cannot be a keyword: {}",
                self.package
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// on-disk codegen configuration, read from a json file by the cli.
///
/// explicit command line flags override manifest values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// path to a schema file
    #[serde(default)]
    pub schema: Option<String>,
    /// http endpoint serving the schema text
    #[serde(default)]
    pub url: Option<String>,
    /// bearer token sent when fetching the schema
    #[serde(default)]
    pub token: Option<String>,
    /// go package name for the generated file
    #[serde(default)]
    pub package: Option<String>,
    /// output path; stdout when absent
    #[serde(default)]
    pub out: Option<String>,
    /// operation document paths
    #[serde(default)]
    pub queries: Vec<String>,
}

impl Manifest {
    /// parse a manifest from json text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_package() {
        let config = Config::new();
        assert_eq!(config.package(), DEFAULT_PACKAGE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_package() {
        let config = Config::new().with_package("api");
        assert_eq!(config.package(), "api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_identifiers() {
        assert!(Config::new().with_package("").validate().is_err());
        assert!(Config::new().with_package("2fast").validate().is_err());
        assert!(Config::new().with_package("my-pkg").validate().is_err());
        assert!(Config::new().with_package("func").validate().is_err());
        assert!(Config::new().with_package("_ok").validate().is_ok());
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest = Manifest::from_json(
            r#"{
                "schema": "schema.graphql",
                "package": "api",
                "queries": ["queries/users.graphql", "queries/posts.graphql"]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.schema.as_deref(), Some("schema.graphql"));
        assert_eq!(manifest.package.as_deref(), Some("api"));
        assert_eq!(manifest.queries.len(), 2);
        assert!(manifest.url.is_none());
        assert!(manifest.out.is_none());
    }

    #[test]
    fn test_manifest_rejects_unknown_fields() {
        let err = Manifest::from_json(r#"{"unknown": true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_manifest_empty_object() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert!(manifest.schema.is_none());
        assert!(manifest.queries.is_empty());
    }
}
