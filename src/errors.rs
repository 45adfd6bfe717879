use crate::ledger::RegistrationKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Failures raised while admitting provider instances.
///
/// Every variant names the offending instance and, where relevant, the
/// `"<type>.<name>"` provider namespace. Raw endpoint values never appear
/// here; duplicates are reported through the claiming instance key instead.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The registration key was claimed by an earlier registration.
    #[error("registration key `{key}` is already claimed")]
    AlreadyRegistered { key: RegistrationKey },

    /// A configured instance entry carries no settings object.
    #[error("instance `{instance}` of provider `{namespace}` declares no settings")]
    MissingSettings { namespace: String, instance: String },

    /// The instance settings carry a blank endpoint.
    #[error("instance `{instance}` of provider `{namespace}` declares no endpoint")]
    MissingEndpoint { namespace: String, instance: String },

    /// The endpoint could not be reduced to a usable fingerprint.
    #[error("endpoint of instance `{instance}` of provider `{namespace}` could not be fingerprinted")]
    UnresolvableEndpoint { namespace: String, instance: String },

    /// Another instance in the same namespace already claimed this endpoint.
    #[error("instance `{instance}` of provider `{namespace}` points at the endpoint already claimed by instance `{existing}`")]
    DuplicateEndpoint {
        namespace: String,
        instance: String,
        existing: String,
    },

    /// The provider's endpoint-parsing hook rejected the raw endpoint.
    #[error("endpoint parsing failed for instance `{instance}` of provider `{namespace}`: {cause}")]
    EndpointParse {
        namespace: String,
        instance: String,
        cause: anyhow::Error,
    },

    /// The provider-specific validation hook rejected the settings.
    #[error("provider validation rejected instance `{instance}` of provider `{namespace}`: {cause}")]
    ProviderValidation {
        namespace: String,
        instance: String,
        cause: anyhow::Error,
    },

    /// The provider's activation hook failed.
    #[error("activation failed for instance `{instance}` of provider `{namespace}`: {cause}")]
    Activation {
        namespace: String,
        instance: String,
        cause: anyhow::Error,
    },
}

impl RegistrationError {
    /// Instance key the failure refers to.
    pub fn instance_key(&self) -> &str {
        match self {
            Self::AlreadyRegistered { key } => key.instance_key(),
            Self::MissingSettings { instance, .. }
            | Self::MissingEndpoint { instance, .. }
            | Self::UnresolvableEndpoint { instance, .. }
            | Self::DuplicateEndpoint { instance, .. }
            | Self::EndpointParse { instance, .. }
            | Self::ProviderValidation { instance, .. }
            | Self::Activation { instance, .. } => instance,
        }
    }
}
