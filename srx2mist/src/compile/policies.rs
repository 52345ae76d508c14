use serde::{Deserialize, Serialize};

use crate::compile::networks::sanitize_name;
use crate::extract::PolicyAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MistAction {
    Allow,
    Deny,
}

impl From<PolicyAction> for MistAction {
    fn from(action: PolicyAction) -> Self {
        match action {
            PolicyAction::Permit => MistAction::Allow,
            PolicyAction::Deny => MistAction::Deny,
        }
    }
}

/// A Mist service policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePolicy {
    pub name: String,
    pub action: MistAction,
    /// Indirect network names for the policy's source addresses.
    pub tenants: Vec<String>,
    /// Application names the policy applies to.
    pub services: Vec<String>,
}

impl ServicePolicy {
    pub fn new(
        policy_name: &str,
        action: PolicyAction,
        tenants: Vec<String>,
        service: String,
    ) -> Self {
        Self {
            name: sanitize_name(policy_name.trim()),
            action: action.into(),
            tenants,
            services: vec![service],
        }
    }
}
