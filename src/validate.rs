use crate::errors::{RegistrationError, Result};
use crate::fingerprint::EndpointFingerprint;
use crate::ledger::RegistrationLedger;
use crate::provider::SecretsProvider;
use crate::settings::InstanceSettings;

/// Validate one instance and claim its endpoint in the ledger.
///
/// Checks run in a fixed order, each failure short-circuiting the rest:
/// settings presence, endpoint presence, the provider's parse hook, the
/// fingerprint, the endpoint claim, and finally the provider-specific
/// validation hook. Structural checks come first so the provider hook only
/// ever sees a sound, already-deduplicated instance.
///
/// Returns the parsed copy of the settings; the caller's original is left
/// untouched.
pub fn validate_instance<P: SecretsProvider>(
    ledger: &RegistrationLedger,
    provider: &P,
    instance_key: &str,
    settings: Option<&InstanceSettings>,
) -> Result<InstanceSettings> {
    let namespace = provider.namespace();

    let Some(settings) = settings else {
        return Err(RegistrationError::MissingSettings {
            namespace,
            instance: instance_key.to_string(),
        });
    };

    if !settings.has_endpoint() {
        return Err(RegistrationError::MissingEndpoint {
            namespace,
            instance: instance_key.to_string(),
        });
    }

    let mut settings = settings.clone();
    provider
        .parse_endpoint(&mut settings)
        .map_err(|cause| RegistrationError::EndpointParse {
            namespace: namespace.clone(),
            instance: instance_key.to_string(),
            cause,
        })?;

    let Some(fingerprint) = EndpointFingerprint::compute(&settings.endpoint) else {
        return Err(RegistrationError::UnresolvableEndpoint {
            namespace,
            instance: instance_key.to_string(),
        });
    };

    ledger.claim_endpoint(&namespace, &fingerprint, instance_key)?;

    provider
        .validate_settings(instance_key, &settings)
        .map_err(|cause| RegistrationError::ProviderValidation {
            namespace: namespace.clone(),
            instance: instance_key.to_string(),
            cause,
        })?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Strict {
        reject: bool,
    }

    impl SecretsProvider for Strict {
        type Services = ();
        type Config = ();

        fn provider_type(&self) -> &str {
            "Secrets"
        }

        fn provider_name(&self) -> &str {
            "Vault"
        }

        fn validate_settings(
            &self,
            _instance_key: &str,
            _settings: &InstanceSettings,
        ) -> anyhow::Result<()> {
            if self.reject {
                bail!("token missing");
            }
            Ok(())
        }

        fn activate(
            &self,
            _instance_key: &str,
            _settings: &InstanceSettings,
            _services: &mut (),
            _config: &(),
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Normalizing;

    impl SecretsProvider for Normalizing {
        type Services = ();
        type Config = ();

        fn provider_type(&self) -> &str {
            "Secrets"
        }

        fn provider_name(&self) -> &str {
            "Vault"
        }

        fn parse_endpoint(&self, settings: &mut InstanceSettings) -> anyhow::Result<()> {
            if let Some(path) = settings.endpoint.strip_prefix("vault://") {
                settings.endpoint = format!("https://vault.local/{path}");
            }
            Ok(())
        }

        fn activate(
            &self,
            _instance_key: &str,
            _settings: &InstanceSettings,
            _services: &mut (),
            _config: &(),
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Erasing;

    impl SecretsProvider for Erasing {
        type Services = ();
        type Config = ();

        fn provider_type(&self) -> &str {
            "Secrets"
        }

        fn provider_name(&self) -> &str {
            "Vault"
        }

        fn parse_endpoint(&self, settings: &mut InstanceSettings) -> anyhow::Result<()> {
            settings.endpoint.clear();
            Ok(())
        }

        fn activate(
            &self,
            _instance_key: &str,
            _settings: &InstanceSettings,
            _services: &mut (),
            _config: &(),
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_settings_is_reported_first() {
        let ledger = RegistrationLedger::new();
        let err = validate_instance(&ledger, &Strict { reject: true }, "primary", None)
            .expect_err("missing settings");
        assert!(matches!(err, RegistrationError::MissingSettings { .. }));
        assert_eq!(ledger.endpoint_claim_count(), 0);
    }

    #[test]
    fn blank_endpoint_wins_over_provider_validation() {
        let ledger = RegistrationLedger::new();
        let settings = InstanceSettings::new("   ");
        let err = validate_instance(&ledger, &Strict { reject: true }, "primary", Some(&settings))
            .expect_err("blank endpoint");
        assert!(matches!(err, RegistrationError::MissingEndpoint { .. }));
    }

    #[test]
    fn parse_hook_normalizes_before_dedup() {
        let ledger = RegistrationLedger::new();
        let canonical = InstanceSettings::new("https://vault.local/team/a");
        validate_instance(&ledger, &Normalizing, "primary", Some(&canonical)).expect("canonical");

        let shorthand = InstanceSettings::new("vault://team/a");
        let err = validate_instance(&ledger, &Normalizing, "secondary", Some(&shorthand))
            .expect_err("normalized duplicate");
        assert!(matches!(
            err,
            RegistrationError::DuplicateEndpoint { ref existing, .. } if existing == "primary"
        ));
    }

    #[test]
    fn parse_hook_erasing_the_endpoint_is_unresolvable() {
        let ledger = RegistrationLedger::new();
        let settings = InstanceSettings::new("vault://team/a");
        let err = validate_instance(&ledger, &Erasing, "primary", Some(&settings))
            .expect_err("erased endpoint");
        assert!(matches!(err, RegistrationError::UnresolvableEndpoint { .. }));
        assert_eq!(ledger.endpoint_claim_count(), 0);
    }

    #[test]
    fn provider_validation_failure_passes_the_cause_through() {
        let ledger = RegistrationLedger::new();
        let settings = InstanceSettings::new("https://vault.local/a");
        let err = validate_instance(&ledger, &Strict { reject: true }, "primary", Some(&settings))
            .expect_err("provider rejection");
        match err {
            RegistrationError::ProviderValidation { cause, .. } => {
                assert_eq!(cause.to_string(), "token missing");
            }
            other => panic!("unexpected error: {other}"),
        }
        // The endpoint claim made before the provider hook stays on the ledger.
        assert_eq!(ledger.endpoint_claim_count(), 1);
    }

    #[test]
    fn valid_instance_returns_the_parsed_copy() {
        let ledger = RegistrationLedger::new();
        let settings = InstanceSettings::new("vault://team/a");
        let parsed =
            validate_instance(&ledger, &Normalizing, "primary", Some(&settings)).expect("valid");
        assert_eq!(parsed.endpoint, "https://vault.local/team/a");
        assert_eq!(settings.endpoint, "vault://team/a");
    }
}
