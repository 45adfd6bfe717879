use crate::errors::{RegistrationError, Result};
use crate::ledger::{RegistrationKey, RegistrationLedger};
use crate::provider::SecretsProvider;
use crate::settings::{InstanceSettings, ProviderSettings};
use crate::telemetry::TelemetrySink;
use crate::validate::validate_instance;
use tracing::{debug, info};

/// Outcome of one provider-level registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Instances admitted by this call.
    pub instances_registered: usize,
    /// Whether activity sources were handed to the telemetry collaborator.
    pub tracing_enabled: bool,
}

/// Orchestrates the claim, validation, and activation of a provider's instances.
///
/// Borrows the bootstrap-scoped [`RegistrationLedger`]; every registrar
/// sharing a ledger shares its uniqueness guarantees. Registration is
/// synchronous and one-shot: the first failure aborts the remaining
/// instances, and claims made before the failure stay on the ledger.
pub struct Registrar<'a> {
    ledger: &'a RegistrationLedger,
    telemetry: Option<&'a dyn TelemetrySink>,
}

impl<'a> Registrar<'a> {
    /// Construct a registrar over the shared ledger.
    pub fn new(ledger: &'a RegistrationLedger) -> Self {
        Self {
            ledger,
            telemetry: None,
        }
    }

    /// Attach the telemetry collaborator consulted after successful
    /// registration of a tracing-enabled provider.
    pub fn with_telemetry(mut self, sink: &'a dyn TelemetrySink) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Register every instance a provider declares.
    ///
    /// Absent settings or an empty instance map are a legal no-op: the call
    /// succeeds without touching the ledger, the provider, or telemetry.
    /// Instances are admitted in key order; the first failure is returned
    /// as-is and aborts the rest without unwinding earlier admissions.
    pub fn register<P: SecretsProvider>(
        &self,
        provider: &P,
        settings: Option<&ProviderSettings>,
        services: &mut P::Services,
        config: &P::Config,
    ) -> Result<RegistrationSummary> {
        let namespace = provider.namespace();

        let Some(settings) = settings.filter(|settings| !settings.is_empty()) else {
            debug!(%namespace, "no instances declared; skipping registration");
            return Ok(RegistrationSummary::default());
        };

        let mut registered = 0;
        for (instance_key, instance) in &settings.instances {
            self.admit(
                provider,
                &namespace,
                instance_key,
                instance.as_ref(),
                services,
                config,
            )?;
            registered += 1;
        }

        let sources = provider.activity_sources();
        let tracing_enabled = settings.tracing_enabled && !sources.is_empty();
        if tracing_enabled {
            match self.telemetry {
                Some(sink) => sink.subscribe(&namespace, sources),
                None => debug!(%namespace, "no telemetry sink attached; activity sources not subscribed"),
            }
        }

        info!(
            %namespace,
            instances = registered,
            tracing = tracing_enabled,
            "secrets provider registered"
        );

        Ok(RegistrationSummary {
            instances_registered: registered,
            tracing_enabled,
        })
    }

    /// Admit a single instance outside full provider registration.
    ///
    /// Runs the same claim, validate, activate sequence; telemetry
    /// is only configured by [`Registrar::register`].
    pub fn register_instance<P: SecretsProvider>(
        &self,
        provider: &P,
        instance_key: &str,
        settings: Option<&InstanceSettings>,
        services: &mut P::Services,
        config: &P::Config,
    ) -> Result<()> {
        let namespace = provider.namespace();
        self.admit(provider, &namespace, instance_key, settings, services, config)
    }

    fn admit<P: SecretsProvider>(
        &self,
        provider: &P,
        namespace: &str,
        instance_key: &str,
        settings: Option<&InstanceSettings>,
        services: &mut P::Services,
        config: &P::Config,
    ) -> Result<()> {
        let key = RegistrationKey::new(
            provider.provider_type(),
            provider.provider_name(),
            instance_key,
        );
        let endpoint = settings.map(|s| s.endpoint.as_str()).unwrap_or_default();
        self.ledger.claim_registration(key.clone(), endpoint)?;

        let validated = validate_instance(self.ledger, provider, instance_key, settings)?;

        provider
            .activate(instance_key, &validated, services, config)
            .map_err(|cause| RegistrationError::Activation {
                namespace: namespace.to_string(),
                instance: instance_key.to_string(),
                cause,
            })?;

        debug!(key = %key, "provider instance registered");
        Ok(())
    }
}
