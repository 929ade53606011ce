//! Configuration loading and management

use crate::apps::{ENVELOPE_FIELD, RESOURCE_PATH};
use crate::core::error::ConfigError;
use crate::core::query::{DEFAULT_ITEMS_PER_PAGE, PageRequest};
use crate::core::sort::SortDirective;
use crate::storage::SortPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Settings for an app collection and the source that feeds it
///
/// Every field is optional in YAML and falls back to the `/v2/apps`
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Scheme, host and port of the remote API
    pub base_url: String,

    /// Path of the collection resource (e.g., "/v2/apps")
    pub resource_path: String,

    /// Envelope field holding the array of records
    pub envelope_field: String,

    /// Initial sort directive (e.g., "-id", "instances:desc")
    pub default_sort: String,

    /// Page size used by views
    pub items_per_page: usize,

    /// Whether mutations re-sort automatically
    pub sort_policy: SortPolicy,

    /// Optional HTTP request timeout
    pub request_timeout_secs: Option<u64>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            resource_path: RESOURCE_PATH.to_string(),
            envelope_field: ENVELOPE_FIELD.to_string(),
            default_sort: "-id".to_string(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            sort_policy: SortPolicy::Explicit,
            request_timeout_secs: None,
        }
    }
}

impl CollectionConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Page request for `page` with the configured page size
    pub fn page_request(&self, page: usize) -> PageRequest {
        PageRequest::new(page, self.items_per_page)
    }

    /// Check the values that cannot be expressed in the type
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.resource_path.starts_with('/') {
            return Err(invalid(
                "resource_path",
                &self.resource_path,
                "must start with '/'",
            ));
        }

        if self.envelope_field.trim().is_empty() {
            return Err(invalid(
                "envelope_field",
                &self.envelope_field,
                "must not be empty",
            ));
        }

        if let Err(e) = self.default_sort.parse::<SortDirective>() {
            return Err(invalid("default_sort", &self.default_sort, &e.to_string()));
        }

        if self.items_per_page == 0 {
            return Err(invalid("items_per_page", "0", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CollectionConfig::default();
        assert_eq!(config.resource_path, "/v2/apps");
        assert_eq!(config.envelope_field, "apps");
        assert_eq!(config.default_sort, "-id");
        assert_eq!(config.items_per_page, 20);
        assert_eq!(config.sort_policy, SortPolicy::Explicit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
base_url: "http://marathon.mesos:8080"
sort_policy: on_mutation
"#;
        let config = CollectionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://marathon.mesos:8080");
        assert_eq!(config.sort_policy, SortPolicy::OnMutation);
        assert_eq!(config.resource_path, "/v2/apps");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
base_url: "http://localhost:9090"
resource_path: "/v2/groups"
envelope_field: "groups"
default_sort: "id:asc"
items_per_page: 50
sort_policy: explicit
request_timeout_secs: 10
"#;
        let config = CollectionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.envelope_field, "groups");
        assert_eq!(config.items_per_page, 50);
        assert_eq!(config.request_timeout_secs, Some(10));
    }

    #[test]
    fn test_invalid_sort_rejected() {
        let err = CollectionConfig::from_yaml_str("default_sort: \"- id\"").unwrap_err();
        assert!(err.to_string().contains("default_sort"));
    }

    #[test]
    fn test_invalid_resource_path_rejected() {
        let config = CollectionConfig {
            resource_path: "v2/apps".to_string(),
            ..CollectionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "resource_path"));
    }

    #[test]
    fn test_unparseable_yaml() {
        let err = CollectionConfig::from_yaml_str("items_per_page: [1, 2").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "items_per_page: 5").unwrap();

        let config = CollectionConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.items_per_page, 5);
        assert_eq!(config.page_request(2).window(100), 10..15);
    }
}
