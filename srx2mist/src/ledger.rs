//! Problem ledger.
//!
//! Every reference the translation cannot resolve, and every construct it
//! recognizes but does not handle, lands here instead of failing the run. The
//! ledger is append-only and serializes as an ordered list of strings.

use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};

/// Whether a problem is a dangling reference or a known-unhandled construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProblemClass {
    Unresolved,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// Application name found in neither the lookup table nor the local applications.
    Application { name: String },
    /// Application-set member not defined when the set line was read.
    ApplicationSetMember { set: String, member: String },
    /// Address-set member not present in the address table.
    AddressSetMember { set: String, member: String },
    /// Destination-address term with no address entry; rendered verbatim.
    DestinationAddress { name: String },
    SourceAddress { zone: String, name: String },
    /// Policy closed without the match terms needed to name its application.
    IncompletePolicy { policy: String, missing: String },
    InterfaceAddress { zone: String, interface: String },
    /// Zone named by a policy with no `security-zone` definition.
    UndefinedZone { zone: String },
    UnsupportedInterface { zone: String, interface: String },
    UnsupportedWildcard { policy: String },
    UnsupportedAddressForm { name: String, form: String },
}

impl Problem {
    pub fn class(&self) -> ProblemClass {
        match self {
            Problem::UnsupportedInterface { .. }
            | Problem::UnsupportedWildcard { .. }
            | Problem::UnsupportedAddressForm { .. } => ProblemClass::Unsupported,
            _ => ProblemClass::Unresolved,
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Application { name } => write!(f, "Application: {name}"),
            Problem::ApplicationSetMember { set, member } => {
                write!(f, "Application: {member} (application-set {set})")
            }
            Problem::AddressSetMember { set, member } => {
                write!(f, "Address: {member} (address-set {set})")
            }
            Problem::DestinationAddress { name } => write!(f, "{name}"),
            Problem::SourceAddress { zone, name } => {
                write!(f, "Source address: {name} (zone {zone})")
            }
            Problem::IncompletePolicy { policy, missing } => {
                write!(f, "Policy: {policy} has no {missing} match")
            }
            Problem::InterfaceAddress { zone, interface } => {
                write!(f, "Interface: {interface} has no address (zone {zone})")
            }
            Problem::UndefinedZone { zone } => {
                write!(f, "Zone: {zone} has no security-zone definition")
            }
            Problem::UnsupportedInterface { zone, interface } => {
                write!(f, "Unsupported: interface {interface} (zone {zone})")
            }
            Problem::UnsupportedWildcard { policy } => {
                write!(f, "Unsupported: wildcard-address in policy {policy}")
            }
            Problem::UnsupportedAddressForm { name, form } => {
                write!(f, "Unsupported: address {name} uses {form}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemLedger {
    problems: Vec<Problem>,
}

impl ProblemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, problem: Problem) {
        tracing::debug!(class = ?problem.class(), "{problem}");
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn count(&self, class: ProblemClass) -> usize {
        self.problems.iter().filter(|p| p.class() == class).count()
    }

    /// Rendered entries in the order they were recorded.
    pub fn entries(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }
}

impl Serialize for ProblemLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.problems.iter().map(ToString::to_string))
    }
}
