use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn tracing_enabled_default() -> bool {
    true
}

/// Provider-level settings bound from the host's configuration tree.
///
/// The documented configuration shape is
/// `{"tracing": true, "instances": {"<key>": {"endpoint": "...", "identifier": "..."}}}`.
/// An instance entry bound to `null` is kept so registration can report it
/// as missing settings instead of silently dropping the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    /// Whether the registrar should enable tracing for the provider's
    /// activity sources after all instances register.
    #[serde(rename = "tracing", default = "tracing_enabled_default")]
    pub tracing_enabled: bool,
    /// Declared instances keyed by instance name. Iterated in key order so
    /// failures are reported reproducibly.
    #[serde(default)]
    pub instances: BTreeMap<String, Option<InstanceSettings>>,
}

impl ProviderSettings {
    /// Construct empty settings with tracing enabled.
    pub fn new() -> Self {
        Self {
            tracing_enabled: true,
            instances: BTreeMap::new(),
        }
    }

    /// Override the tracing flag.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }

    /// Declare an instance.
    pub fn with_instance(mut self, key: impl Into<String>, settings: InstanceSettings) -> Self {
        self.instances.insert(key.into(), Some(settings));
        self
    }

    /// True when no instances are declared.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for one configured connection of a provider.
///
/// Provider-specific fields are captured in `extra` and recovered through
/// [`InstanceSettings::extension`], so concrete providers extend the shape
/// without subclassing. The endpoint is raw configuration text until the
/// provider's parse hook normalizes it; after validation the value is
/// treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceSettings {
    /// Raw connection/address string; semantics are provider-defined.
    #[serde(default)]
    pub endpoint: String,
    /// Optional provider-defined identifier (client id, role, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Provider-specific fields flattened from the configuration entry.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl InstanceSettings {
    /// Construct settings for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            identifier: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach an identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Attach a provider-specific field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// True when the endpoint carries any non-whitespace content.
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Recover the provider-specific fields as a typed value.
    pub fn extension<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let map = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<serde_json::Map<String, Value>>();
        serde_json::from_value(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binds_the_documented_configuration_shape() {
        let settings: ProviderSettings = serde_json::from_value(json!({
            "tracing": false,
            "instances": {
                "primary": {"endpoint": "https://vault.local/a", "identifier": "app"},
                "unbound": null
            }
        }))
        .expect("bind");

        assert!(!settings.tracing_enabled);
        assert_eq!(settings.instances.len(), 2);
        let primary = settings.instances["primary"].as_ref().expect("primary");
        assert_eq!(primary.endpoint, "https://vault.local/a");
        assert_eq!(primary.identifier.as_deref(), Some("app"));
        assert!(settings.instances["unbound"].is_none());
    }

    #[test]
    fn tracing_defaults_to_enabled() {
        let settings: ProviderSettings =
            serde_json::from_value(json!({ "instances": {} })).expect("bind");
        assert!(settings.tracing_enabled);
        assert!(settings.is_empty());
    }

    #[test]
    fn provider_fields_flatten_into_extra() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct VaultFields {
            mount: String,
            version: u32,
        }

        let instance: InstanceSettings = serde_json::from_value(json!({
            "endpoint": "https://vault.local/a",
            "mount": "kv",
            "version": 2
        }))
        .expect("bind");

        assert_eq!(instance.extra.len(), 2);
        let fields: VaultFields = instance.extension().expect("typed view");
        assert_eq!(
            fields,
            VaultFields {
                mount: "kv".into(),
                version: 2
            }
        );
    }

    #[test]
    fn blank_endpoint_is_detected() {
        assert!(!InstanceSettings::new("  ").has_endpoint());
        assert!(InstanceSettings::new("https://vault.local/a").has_endpoint());
    }
}
