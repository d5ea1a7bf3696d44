//! # Verifier access policy
//!
//! Decides whether a caller may change a credential's verification status.
//! The service only ever sees the [`AccessPolicy`] trait, so widening the
//! rule (several institutions, attribute-based checks) does not touch it.

/// MSP ID of the verifying institution on the original two-org network.
pub const DEFAULT_VERIFIER_MSPID: &str = "Org1MSP";

/// Predicate over the caller's organizational identity.
pub trait AccessPolicy: Send + Sync {
    fn is_authorized_verifier(&self, caller_identity: &str) -> bool;
}

impl<F> AccessPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_authorized_verifier(&self, caller_identity: &str) -> bool {
        self(caller_identity)
    }
}

/// Exactly one recognized verifying organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleVerifierPolicy {
    verifier: String,
}

impl SingleVerifierPolicy {
    pub fn new(verifier: impl Into<String>) -> Self {
        Self {
            verifier: verifier.into(),
        }
    }

    pub fn verifier(&self) -> &str {
        &self.verifier
    }
}

impl Default for SingleVerifierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_VERIFIER_MSPID)
    }
}

impl AccessPolicy for SingleVerifierPolicy {
    fn is_authorized_verifier(&self, caller_identity: &str) -> bool {
        caller_identity == self.verifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn default_policy_admits_only_org1() {
        let policy = SingleVerifierPolicy::default();
        assert_eq!(policy.verifier(), "Org1MSP");
        assert!(policy.is_authorized_verifier("Org1MSP"));
        assert!(!policy.is_authorized_verifier("Org2MSP"));
        assert!(!policy.is_authorized_verifier("org1msp"));
        assert!(!policy.is_authorized_verifier(""));
    }

    #[test]
    fn configured_verifier() {
        let policy = SingleVerifierPolicy::new("UniversityMSP");
        assert!(policy.is_authorized_verifier("UniversityMSP"));
        assert!(!policy.is_authorized_verifier("Org1MSP"));
    }

    #[test]
    fn closures_are_policies() {
        let policy: Arc<dyn AccessPolicy> =
            Arc::new(|id: &str| id == "Org1MSP" || id == "Org3MSP");
        assert!(policy.is_authorized_verifier("Org3MSP"));
        assert!(!policy.is_authorized_verifier("Org2MSP"));
    }
}
