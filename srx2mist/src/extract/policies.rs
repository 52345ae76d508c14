//! Security policy extraction.
//!
//! Policy statements arrive as a run of `match` lines followed by one or more
//! `then` lines. The match terms are gathered in a [`MatchState`] until a
//! `then permit` or `then deny` line closes the policy; `then log`, `then count`
//! and similar clauses leave the state untouched. Any other terminal action
//! (`reject`, for instance) never closes the policy, so it is dropped.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use set_config_core::Statement;

use crate::classify::{classify, SrxStatement};
use crate::ledger::{Problem, ProblemLedger};

pub const SOURCE_ADDRESS: &str = "source-address";
pub const DESTINATION_ADDRESS: &str = "destination-address";
pub const APPLICATION: &str = "application";

/// Match type (`source-address`, `application`, ...) to its criteria, in line order.
pub type MatchSet = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Permit,
    Deny,
}

impl PolicyAction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "permit" => Some(PolicyAction::Permit),
            "deny" => Some(PolicyAction::Deny),
            _ => None,
        }
    }
}

impl Display for PolicyAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PolicyAction::Permit => write!(f, "permit"),
            PolicyAction::Deny => write!(f, "deny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyApplication {
    /// `<first destination-address>-<first application>`.
    pub app_name: String,
    pub match_set: MatchSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(rename = "Application")]
    pub application: PolicyApplication,
    #[serde(rename = "Action")]
    pub action: PolicyAction,
}

impl Policy {
    /// Criteria for one match type; empty when the policy never matched on it.
    pub fn terms(&self, match_type: &str) -> &[String] {
        self.application
            .match_set
            .get(match_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All policies for one from-zone/to-zone pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePair {
    #[serde(rename = "FromZone")]
    pub from_zone: String,
    #[serde(rename = "ToZone")]
    pub to_zone: String,
    #[serde(rename = "Policies")]
    pub policies: IndexMap<String, Policy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policies {
    entries: IndexMap<String, ZonePair>,
}

impl Policies {
    pub fn zone_pairs(&self) -> impl Iterator<Item = &ZonePair> {
        self.entries.values()
    }

    pub fn get(&self, key: &str) -> Option<&ZonePair> {
        self.entries.get(key)
    }

    /// Number of policies across all zone pairs.
    pub fn policy_count(&self) -> usize {
        self.entries.values().map(|pair| pair.policies.len()).sum()
    }

    fn insert(&mut self, from_zone: &str, to_zone: &str, name: &str, policy: Policy) {
        let pair = self
            .entries
            .entry(format!("{from_zone}-{to_zone}"))
            .or_insert_with(|| ZonePair {
                from_zone: from_zone.to_string(),
                to_zone: to_zone.to_string(),
                policies: IndexMap::new(),
            });
        pair.policies.insert(name.to_string(), policy);
    }
}

/// Working match terms between policy boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchState {
    #[default]
    Idle,
    Accumulating(MatchSet),
}

impl MatchState {
    /// Record one `match <type> <criteria>` term.
    pub fn push(&mut self, match_type: &str, criteria: &str) {
        if let MatchState::Idle = self {
            *self = MatchState::Accumulating(MatchSet::new());
        }
        if let MatchState::Accumulating(set) = self {
            set.entry(match_type.to_string())
                .or_default()
                .push(criteria.to_string());
        }
    }

    /// Close the current policy, returning its terms and resetting to `Idle`.
    pub fn close(&mut self) -> MatchSet {
        match std::mem::take(self) {
            MatchState::Idle => MatchSet::new(),
            MatchState::Accumulating(set) => set,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MatchState::Idle)
    }
}

pub fn extract(statements: &[Statement], ledger: &mut ProblemLedger) -> Policies {
    let mut policies = Policies::default();
    let mut state = MatchState::default();

    for stmt in statements {
        match classify(stmt) {
            Some(SrxStatement::PolicyMatch {
                match_type,
                criteria,
                ..
            }) => state.push(match_type, criteria),
            Some(SrxStatement::PolicyThen {
                from_zone,
                to_zone,
                policy,
                action,
            }) => {
                let Some(action) = PolicyAction::from_keyword(action) else {
                    tracing::debug!(line = stmt.line, "policy {policy}: non-terminal then {action}");
                    continue;
                };
                if state.is_idle() {
                    // A policy prints one terminal line per permit sub-clause
                    // (`then permit application-services idp`); only the first closes it.
                    tracing::debug!(line = stmt.line, "policy {policy}: repeated then {action}");
                    continue;
                }
                let match_set = state.close();
                match application_name(&match_set) {
                    Ok(app_name) => policies.insert(
                        from_zone,
                        to_zone,
                        policy,
                        Policy {
                            application: PolicyApplication {
                                app_name,
                                match_set,
                            },
                            action,
                        },
                    ),
                    Err(missing) => ledger.record(Problem::IncompletePolicy {
                        policy: policy.to_string(),
                        missing: missing.to_string(),
                    }),
                }
            }
            _ => {}
        }
    }

    if !state.is_idle() {
        tracing::debug!("policy match terms left open at end of input");
    }
    policies
}

/// Name the policy's application from the first destination-address and the
/// first application term. Later terms are still used for resolution.
fn application_name(match_set: &MatchSet) -> Result<String, &'static str> {
    let first = |match_type: &'static str| {
        match_set
            .get(match_type)
            .and_then(|terms| terms.first())
            .ok_or(match_type)
    };
    Ok(format!("{}-{}", first(DESTINATION_ADDRESS)?, first(APPLICATION)?))
}
