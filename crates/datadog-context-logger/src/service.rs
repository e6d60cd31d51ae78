// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Static service identity attached to every record a logger emits.

use serde::Deserialize;
use serde_json::Value;

use crate::fields::Fields;

pub const SERVICE_ENVIRONMENT_KEY: &str = "service.environment";
pub const SERVICE_NAME_KEY: &str = "service.name";
pub const SERVICE_VERSION_KEY: &str = "service.version";
pub const SERVICE_INSTANCE_ID_KEY: &str = "service.instance.id";

/// Deployment metadata for the running process.
///
/// Empty members are left out of emitted records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    pub environment: String,
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

impl ServiceInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environment.is_empty()
            && self.name.is_empty()
            && self.version.is_empty()
            && self.instance_id.is_empty()
    }

    /// Non-empty members under their `service.*` keys.
    #[must_use]
    pub fn fields(&self) -> Fields {
        [
            (SERVICE_ENVIRONMENT_KEY, &self.environment),
            (SERVICE_NAME_KEY, &self.name),
            (SERVICE_VERSION_KEY, &self.version),
            (SERVICE_INSTANCE_ID_KEY, &self.instance_id),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_skip_empty_members() {
        let info = ServiceInfo {
            environment: "prod".to_string(),
            name: "checkout".to_string(),
            version: String::new(),
            instance_id: "i-123".to_string(),
        };

        let fields = info.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get(SERVICE_ENVIRONMENT_KEY), Some(&json!("prod")));
        assert_eq!(fields.get(SERVICE_NAME_KEY), Some(&json!("checkout")));
        assert_eq!(fields.get(SERVICE_INSTANCE_ID_KEY), Some(&json!("i-123")));
        assert!(!fields.contains_key(SERVICE_VERSION_KEY));
    }

    #[test]
    fn test_empty_info() {
        let info = ServiceInfo::default();
        assert!(info.is_empty());
        assert!(info.fields().is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let info: ServiceInfo =
            serde_json::from_value(json!({ "name": "api", "version": "1.2.3" })).unwrap();
        assert_eq!(info.name, "api");
        assert_eq!(info.version, "1.2.3");
        assert!(info.environment.is_empty());
    }
}
