use crate::settings::InstanceSettings;

/// Capability contract a concrete secrets provider fulfils to take part in
/// registration.
///
/// The service-registration and configuration-source targets stay opaque to
/// this subsystem; they are threaded through to [`SecretsProvider::activate`]
/// untouched. Only `provider_type`, `provider_name`, and `activate` have no
/// defaults; everything else is opt-in.
pub trait SecretsProvider {
    /// Host handle the activation hook registers services into.
    type Services;
    /// Host handle the activation hook reads configuration from.
    type Config;

    /// Stable tag naming the provider kind, e.g. `"Secrets"`.
    fn provider_type(&self) -> &str;

    /// Name distinguishing this provider among its kind, e.g. `"Vault"`.
    fn provider_name(&self) -> &str;

    /// Activity sources the telemetry collaborator should subscribe when
    /// tracing is enabled for this provider.
    fn activity_sources(&self) -> &[&str] {
        &[]
    }

    /// Normalize the raw endpoint in place, e.g. expanding a shorthand into
    /// a canonical connection string. Invoked exactly once per instance,
    /// after the endpoint is known to be non-blank. The default leaves the
    /// settings untouched.
    fn parse_endpoint(&self, settings: &mut InstanceSettings) -> anyhow::Result<()> {
        let _ = settings;
        Ok(())
    }

    /// Provider-specific validation, run last so it always sees a
    /// structurally sound, already-deduplicated instance. Failures are
    /// passed through to the caller unchanged.
    fn validate_settings(
        &self,
        instance_key: &str,
        settings: &InstanceSettings,
    ) -> anyhow::Result<()> {
        let _ = (instance_key, settings);
        Ok(())
    }

    /// Wire one validated instance into the host application.
    fn activate(
        &self,
        instance_key: &str,
        settings: &InstanceSettings,
        services: &mut Self::Services,
        config: &Self::Config,
    ) -> anyhow::Result<()>;

    /// `"<type>.<name>"` namespace shared by this provider's ledger claims.
    fn namespace(&self) -> String {
        format!("{}.{}", self.provider_type(), self.provider_name())
    }
}
