//! Mist object compiler.
//!
//! Walks every policy of every zone pair once and produces, per policy:
//!
//! 1. a custom application from its `application` and `destination-address`
//!    terms, registered through the application [`Namespace`] so name
//!    collisions are merged or renamed;
//! 2. the interface networks of its source zone (first policy of a zone only);
//! 3. indirect networks for its `source-address` terms, which become tenants;
//! 4. a service policy tying the tenants to the application.
//!
//! Once every policy is compiled, each zone's indirect networks are attached to
//! all of that zone's interface networks.

pub mod applications;
pub mod networks;
pub mod policies;

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::extract::policies::SOURCE_ADDRESS;
use crate::extract::Extraction;
use crate::ledger::ProblemLedger;
use crate::registry::{Namespace, Registration};
use crate::resolve::AppResolver;

pub use applications::MistApplication;
pub use networks::{IndirectNetwork, InterfaceNetwork, OrganizedNetworks, ZoneNetworks};
pub use policies::{MistAction, ServicePolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompileStats {
    /// Applications identical to one already compiled under the same name.
    pub fully_duplicate: usize,
    /// Applications renamed with the `_dupe` suffix.
    pub renamed: usize,
    /// Policies whose name was already used by another zone pair.
    pub replaced_policies: usize,
}

/// An application name collision, reported to the operator on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateNotice {
    /// Same name and content as an application already compiled; not re-added.
    FullyDuplicate { name: String, policy: String },
    /// Same name, different content; stored under `renamed`.
    Renamed {
        name: String,
        renamed: String,
        policy: String,
    },
}

impl Display for DuplicateNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateNotice::FullyDuplicate { name, policy } => {
                write!(f, "Fully duplicate app: {name} (policy {policy})")
            }
            DuplicateNotice::Renamed {
                name,
                renamed,
                policy,
            } => write!(f, "Duplicate name: {name} renamed to {renamed} (policy {policy})"),
        }
    }
}

impl Serialize for DuplicateNotice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    pub applications: Namespace<MistApplication>,
    pub networks: OrganizedNetworks,
    /// Keyed by the policy name as written on the device.
    pub policies: IndexMap<String, ServicePolicy>,
    pub stats: CompileStats,
    /// Name collisions in the order they were met.
    pub duplicates: Vec<DuplicateNotice>,
}

pub fn compile(
    extraction: &Extraction,
    resolver: &AppResolver<'_>,
    ledger: &mut ProblemLedger,
) -> Compilation {
    let mut out = Compilation::default();

    for pair in extraction.policies.zone_pairs() {
        let zone = pair.from_zone.as_str();
        for (policy_name, policy) in &pair.policies {
            let app = applications::build(
                policy_name,
                policy,
                &extraction.applications,
                &extraction.addresses,
                resolver,
                ledger,
            );
            let app_name = app.name.clone();
            let registration = out.applications.register(app);
            match &registration {
                Registration::Inserted(_) => {}
                Registration::Duplicate(_) => {
                    out.stats.fully_duplicate += 1;
                    out.duplicates.push(DuplicateNotice::FullyDuplicate {
                        name: app_name,
                        policy: policy_name.clone(),
                    });
                }
                Registration::Renamed(renamed) => {
                    out.stats.renamed += 1;
                    out.duplicates.push(DuplicateNotice::Renamed {
                        name: app_name,
                        renamed: renamed.clone(),
                        policy: policy_name.clone(),
                    });
                }
            }

            if !out.networks.has_zone(zone) {
                out.networks.add_interface_networks(
                    zone,
                    &extraction.zones,
                    &extraction.interfaces,
                    ledger,
                );
            }
            let tenants = out.networks.add_indirect_networks(
                zone,
                policy.terms(SOURCE_ADDRESS),
                &extraction.addresses,
                ledger,
            );

            let compiled = ServicePolicy::new(
                policy_name,
                policy.action,
                tenants,
                registration.name().to_string(),
            );
            if out.policies.insert(policy_name.clone(), compiled).is_some() {
                tracing::warn!("policy name {policy_name} reused across zone pairs; keeping the last one");
                out.stats.replaced_policies += 1;
            }
        }
    }

    out.networks.attach_indirect_networks();
    tracing::info!(
        applications = out.applications.len(),
        interface_networks = out.networks.interface_count(),
        indirect_networks = out.networks.indirect_count(),
        policies = out.policies.len(),
        "compiled Mist objects"
    );
    out
}
