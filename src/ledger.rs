use crate::errors::{RegistrationError, Result};
use crate::fingerprint::EndpointFingerprint;
use parking_lot::Mutex;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Uniqueness token identifying one instance within one provider type+name.
///
/// Rendered as `"<ProviderType>.<ProviderName>::<InstanceKey>"`; derived on
/// demand, never bound from configuration.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationKey(String);

impl RegistrationKey {
    /// Derive the key for one instance of one provider.
    pub fn new(provider_type: &str, provider_name: &str, instance_key: &str) -> Self {
        Self(format!("{provider_type}.{provider_name}::{instance_key}"))
    }

    /// Full key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instance segment of the key.
    pub fn instance_key(&self) -> &str {
        match self.0.split_once("::") {
            Some((_, instance)) => instance,
            None => &self.0,
        }
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegistrationKey").field(&self.0).finish()
    }
}

#[derive(Default)]
struct LedgerMaps {
    /// registration key -> raw endpoint as declared at claim time.
    registrations: BTreeMap<RegistrationKey, String>,
    /// `"<namespace>::<fingerprint>"` -> claiming instance key.
    endpoints: BTreeMap<String, String>,
}

/// Append-only record of claimed registration keys and endpoint fingerprints.
///
/// One ledger is constructed at application bootstrap and shared by
/// reference with every registrar. Claims are never released: a key or
/// endpoint admitted once stays claimed for the ledger's lifetime, even when
/// a later step of the same registration fails. Both claim operations take a
/// single lock over both maps, so check and insert are one indivisible step
/// under concurrent registration.
#[derive(Default)]
pub struct RegistrationLedger {
    inner: Mutex<LedgerMaps>,
}

impl RegistrationLedger {
    /// Construct an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a registration key, recording the raw endpoint it was declared
    /// with. Succeeds exactly once per key; every later claim of the same
    /// key fails, regardless of the endpoint value.
    pub fn claim_registration(&self, key: RegistrationKey, endpoint: &str) -> Result<()> {
        let mut maps = self.inner.lock();
        match maps.registrations.entry(key) {
            Entry::Occupied(entry) => Err(RegistrationError::AlreadyRegistered {
                key: entry.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(endpoint.to_string());
                Ok(())
            }
        }
    }

    /// Claim an endpoint fingerprint within a provider namespace.
    ///
    /// Fingerprints are compared only within the same `"<type>.<name>"`
    /// namespace, so two unrelated provider kinds may point at the same
    /// physical endpoint.
    pub fn claim_endpoint(
        &self,
        namespace: &str,
        fingerprint: &EndpointFingerprint,
        instance_key: &str,
    ) -> Result<()> {
        let scoped = format!("{namespace}::{fingerprint}");
        let mut maps = self.inner.lock();
        match maps.endpoints.entry(scoped) {
            Entry::Occupied(entry) => Err(RegistrationError::DuplicateEndpoint {
                namespace: namespace.to_string(),
                instance: instance_key.to_string(),
                existing: entry.get().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(instance_key.to_string());
                Ok(())
            }
        }
    }

    /// Whether a registration key has been claimed.
    pub fn is_registered(&self, key: &RegistrationKey) -> bool {
        self.inner.lock().registrations.contains_key(key)
    }

    /// Number of claimed registration keys.
    pub fn registration_count(&self) -> usize {
        self.inner.lock().registrations.len()
    }

    /// Number of claimed endpoint fingerprints across all namespaces.
    pub fn endpoint_claim_count(&self) -> usize {
        self.inner.lock().endpoints.len()
    }
}
