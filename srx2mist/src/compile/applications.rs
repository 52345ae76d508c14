use serde::{Deserialize, Serialize};

use crate::extract::policies::{APPLICATION, DESTINATION_ADDRESS};
use crate::extract::{Addresses, Applications, Policy};
use crate::ledger::{Problem, ProblemLedger};
use crate::registry::Named;
use crate::resolve::{AppResolver, AppSpec};

pub const ANY_SUBNET: &str = "0.0.0.0/0";
pub const WILDCARD_ADDRESS: &str = "wildcard-address";

/// A Mist custom application (service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistApplication {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub traffic_type: String,
    pub specs: Vec<AppSpec>,
    /// Absent when the policy matched a wildcard address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
}

impl Named for MistApplication {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.name = name;
    }

    fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.traffic_type == other.traffic_type
            && self.specs == other.specs
            && self.addresses == other.addresses
    }
}

/// Build the application a policy's `application` and `destination-address`
/// terms describe.
pub fn build(
    policy_name: &str,
    policy: &Policy,
    local_apps: &Applications,
    addresses: &Addresses,
    resolver: &AppResolver<'_>,
    ledger: &mut ProblemLedger,
) -> MistApplication {
    let specs = resolver.resolve(policy.terms(APPLICATION), local_apps, ledger);

    let destinations = policy.terms(DESTINATION_ADDRESS);
    let addresses = if destinations.iter().any(|d| d == WILDCARD_ADDRESS) {
        ledger.record(Problem::UnsupportedWildcard {
            policy: policy_name.to_string(),
        });
        None
    } else {
        Some(destination_subnets(destinations, addresses, ledger))
    };

    MistApplication {
        name: policy.application.app_name.clone(),
        description: format!("Original Policy Name: {policy_name}"),
        kind: "custom".to_string(),
        traffic_type: "default".to_string(),
        specs,
        addresses,
    }
}

fn destination_subnets(
    terms: &[String],
    addresses: &Addresses,
    ledger: &mut ProblemLedger,
) -> Vec<String> {
    let mut out = Vec::new();
    for term in terms {
        if let Some(ips) = addresses.get(term) {
            out.extend(ips.iter().cloned());
        } else if term == "any" {
            out.push(ANY_SUBNET.to_string());
        } else {
            ledger.record(Problem::DestinationAddress { name: term.clone() });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use set_config_core::parse;

    use super::{build, MistApplication};
    use crate::extract::{extract_all, Extraction};
    use crate::ledger::ProblemLedger;
    use crate::registry::Named;
    use crate::resolve::{AppDefinitions, AppResolver};

    fn extraction(policy_lines: &[&str]) -> Extraction {
        let mut text = String::from(
            "set applications application ssh protocol tcp\n\
             set applications application ssh destination-port 22\n\
             set security address-book global address web 10.0.0.5/32\n",
        );
        for line in policy_lines {
            text.push_str("set security policies from-zone trust to-zone untrust policy p1 ");
            text.push_str(line);
            text.push('\n');
        }
        extract_all(&parse(&text), &mut ProblemLedger::new())
    }

    fn compile_p1(ex: &Extraction, ledger: &mut ProblemLedger) -> MistApplication {
        let defs = AppDefinitions::empty();
        let policy = &ex.policies.get("trust-untrust").expect("pair").policies["p1"];
        build(
            "p1",
            policy,
            &ex.applications,
            &ex.addresses,
            &AppResolver::new(&defs),
            ledger,
        )
    }

    #[test]
    fn resolves_destinations_and_specs() {
        let ex = extraction(&[
            "match source-address any",
            "match destination-address web",
            "match destination-address any",
            "match destination-address printer",
            "match application ssh",
            "then permit",
        ]);
        let mut ledger = ProblemLedger::new();
        let app = compile_p1(&ex, &mut ledger);

        assert_eq!(app.name, "web-ssh");
        assert_eq!(app.description, "Original Policy Name: p1");
        assert_eq!(
            app.addresses,
            Some(vec!["10.0.0.5/32".to_string(), "0.0.0.0/0".to_string()])
        );
        assert_eq!(app.specs[0].port_range.as_deref(), Some("22-22"));
        assert_eq!(ledger.entries(), vec!["printer".to_string()]);
    }

    #[test]
    fn wildcard_destination_omits_addresses() {
        let ex = extraction(&[
            "match source-address any",
            "match destination-address wildcard-address",
            "match application ssh",
            "then permit",
        ]);
        let mut ledger = ProblemLedger::new();
        let app = compile_p1(&ex, &mut ledger);

        assert_eq!(app.addresses, None);
        assert_eq!(
            ledger.entries(),
            vec!["Unsupported: wildcard-address in policy p1".to_string()]
        );
        let json = serde_json::to_value(&app).expect("serialize");
        assert!(json.get("addresses").is_none());
        assert_eq!(json["type"], "custom");
    }

    #[test]
    fn content_comparison_ignores_description() {
        let ex = extraction(&[
            "match source-address any",
            "match destination-address web",
            "match application ssh",
            "then permit",
        ]);
        let a = compile_p1(&ex, &mut ProblemLedger::new());
        let mut b = a.clone();
        b.description = "Original Policy Name: p7".to_string();
        assert!(a.same_content(&b));
        b.specs.clear();
        assert!(!a.same_content(&b));
    }
}
