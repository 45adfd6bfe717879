//! Registration and validation for pluggable secrets providers.
//!
//! A host application binds a [`ProviderSettings`] tree from its
//! configuration system, constructs one [`RegistrationLedger`] for the
//! bootstrap phase, and drives a [`Registrar`] once per provider. The
//! registrar claims identity in the ledger, runs the ordered validation
//! sequence, and invokes the provider's activation hook for every declared
//! instance. Duplicate registration keys and duplicate endpoints are
//! rejected for the lifetime of the ledger.

pub mod errors;
pub mod fingerprint;
pub mod ledger;
pub mod provider;
pub mod registrar;
pub mod settings;
pub mod telemetry;
pub mod validate;

pub use errors::{RegistrationError, Result};
pub use fingerprint::EndpointFingerprint;
pub use ledger::{RegistrationKey, RegistrationLedger};
pub use provider::SecretsProvider;
pub use registrar::{Registrar, RegistrationSummary};
pub use settings::{InstanceSettings, ProviderSettings};
pub use telemetry::{LogTelemetry, TelemetrySink};
pub use validate::validate_instance;
