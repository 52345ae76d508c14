//! Entity extractors.
//!
//! Each extractor scans the full statement list on its own and builds one
//! typed collection. They share nothing but the statements and the problem
//! ledger, so running them in sequence over the same input is all the
//! coordination needed.

pub mod addresses;
pub mod applications;
pub mod interfaces;
pub mod policies;
pub mod zones;

use set_config_core::Statement;

use crate::ledger::ProblemLedger;

pub use addresses::Addresses;
pub use applications::{AppEntry, AppRecord, Applications};
pub use interfaces::{Interface, Interfaces, Unit};
pub use policies::{MatchSet, MatchState, Policies, Policy, PolicyAction, ZonePair};
pub use zones::{Zone, Zones};

/// The raw device model, one collection per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub applications: Applications,
    pub addresses: Addresses,
    pub zones: Zones,
    pub interfaces: Interfaces,
    pub policies: Policies,
}

/// Run every extractor over `statements`.
pub fn extract_all(statements: &[Statement], ledger: &mut ProblemLedger) -> Extraction {
    let applications = applications::extract(statements, ledger);
    let addresses = addresses::extract(statements, ledger);
    let policies = policies::extract(statements, ledger);
    let zones = zones::extract(statements);
    let interfaces = interfaces::extract(statements);
    tracing::info!(
        applications = applications.len(),
        addresses = addresses.len(),
        policies = policies.policy_count(),
        zones = zones.len(),
        interfaces = interfaces.len(),
        "extracted device model"
    );
    Extraction {
        applications,
        addresses,
        zones,
        interfaces,
        policies,
    }
}
