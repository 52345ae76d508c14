//! Network derivation.
//!
//! Mist networks come from two places. Interface networks are the subnets of
//! the physical/IRB interfaces bound to a policy's source zone. Indirect
//! networks are the subnets a policy's `source-address` terms resolve to; they
//! become the policy's tenants. Both are grouped by source zone, and indirect
//! networks are keyed by subnet so a subnet seen twice in one zone keeps the
//! name it was first given.

use std::str::FromStr;

use indexmap::IndexMap;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use crate::compile::applications::ANY_SUBNET;
use crate::extract::{Addresses, Interfaces, Zones};
use crate::ledger::{Problem, ProblemLedger};

/// Interface name prefixes with a Mist network counterpart.
pub const SUPPORTED_INTERFACE_PREFIXES: &[&str] = &["irb", "ge", "xe", "et"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceNetwork {
    pub name: String,
    pub subnet: String,
    pub routed_for_networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectNetwork {
    pub name: String,
    pub subnet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneNetworks {
    /// Keyed by zone interface (`ge-0/0/0.0`).
    #[serde(rename = "interface nets")]
    pub interface_nets: IndexMap<String, InterfaceNetwork>,
    /// Keyed by subnet.
    #[serde(rename = "indirect nets")]
    pub indirect_nets: IndexMap<String, IndirectNetwork>,
}

impl ZoneNetworks {
    /// Return the name of the indirect network for `subnet`, creating it as
    /// `name` when the zone has not seen that subnet yet.
    fn indirect(&mut self, subnet: &str, name: String) -> String {
        self.indirect_nets
            .entry(subnet.to_string())
            .or_insert_with(|| IndirectNetwork {
                name,
                subnet: subnet.to_string(),
            })
            .name
            .clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizedNetworks {
    zones: IndexMap<String, ZoneNetworks>,
}

impl OrganizedNetworks {
    pub fn zone(&self, zone: &str) -> Option<&ZoneNetworks> {
        self.zones.get(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = (&String, &ZoneNetworks)> {
        self.zones.iter()
    }

    pub fn interface_count(&self) -> usize {
        self.zones.values().map(|z| z.interface_nets.len()).sum()
    }

    pub fn indirect_count(&self) -> usize {
        self.zones.values().map(|z| z.indirect_nets.len()).sum()
    }

    /// True when `zone` already has a network group.
    pub fn has_zone(&self, zone: &str) -> bool {
        self.zones.contains_key(zone)
    }

    /// Create the interface networks for `zone` from its bound interfaces.
    ///
    /// Interfaces of an unsupported type, or whose unit carries no usable
    /// address, are recorded and skipped.
    pub fn add_interface_networks(
        &mut self,
        zone: &str,
        zones: &Zones,
        interfaces: &Interfaces,
        ledger: &mut ProblemLedger,
    ) {
        let nets = self.zones.entry(zone.to_string()).or_default();
        let Some(zone_def) = zones.get(zone) else {
            tracing::warn!("zone {zone} has no definition; no interface networks");
            ledger.record(Problem::UndefinedZone {
                zone: zone.to_string(),
            });
            return;
        };

        for zint in &zone_def.interfaces {
            let (base, unit) = split_unit(zint);
            if !SUPPORTED_INTERFACE_PREFIXES
                .iter()
                .any(|prefix| base.starts_with(prefix))
            {
                tracing::warn!("interface {zint} not currently supported, ignoring");
                ledger.record(Problem::UnsupportedInterface {
                    zone: zone.to_string(),
                    interface: zint.clone(),
                });
                continue;
            }

            let subnet = interfaces
                .unit(base, unit)
                .filter(|u| !u.address.is_empty())
                .and_then(|u| network_cidr(&u.address));
            let Some(subnet) = subnet else {
                tracing::warn!("no usable address for interface {zint}");
                ledger.record(Problem::InterfaceAddress {
                    zone: zone.to_string(),
                    interface: zint.clone(),
                });
                continue;
            };

            nets.interface_nets
                .entry(zint.clone())
                .or_insert_with(|| InterfaceNetwork {
                    name: network_name(zone, zint),
                    subnet,
                    routed_for_networks: Vec::new(),
                });
        }
    }

    /// Resolve source-address terms to indirect networks of `zone` and return
    /// their names in term order.
    pub fn add_indirect_networks(
        &mut self,
        zone: &str,
        terms: &[String],
        addresses: &Addresses,
        ledger: &mut ProblemLedger,
    ) -> Vec<String> {
        let nets = self.zones.entry(zone.to_string()).or_default();
        let mut tenants = Vec::new();
        for term in terms {
            let base = network_name(zone, term);
            if let Some(ips) = addresses.get(term) {
                for (idx, ip) in ips.iter().enumerate() {
                    tenants.push(nets.indirect(ip, format!("{base}_{}", idx + 1)));
                }
            } else if term == "any" {
                tenants.push(nets.indirect(ANY_SUBNET, base));
            } else {
                tracing::warn!("source address {term} not found");
                ledger.record(Problem::SourceAddress {
                    zone: zone.to_string(),
                    name: term.clone(),
                });
            }
        }
        tenants
    }

    /// Route every indirect network of a zone through every interface network
    /// of the same zone.
    pub fn attach_indirect_networks(&mut self) {
        for nets in self.zones.values_mut() {
            let names: Vec<String> = nets
                .indirect_nets
                .values()
                .map(|net| net.name.clone())
                .collect();
            for int_net in nets.interface_nets.values_mut() {
                int_net.routed_for_networks.extend(names.iter().cloned());
            }
        }
    }
}

/// Mist-safe object name: `.`, `-` and spaces become `_`.
pub fn sanitize_name(raw: &str) -> String {
    raw.replace(['.', '-', ' '], "_")
}

fn network_name(zone: &str, token: &str) -> String {
    sanitize_name(&format!("{zone}_{token}"))
}

/// Split `ge-0/0/0.10` into `("ge-0/0/0", "10")`. An interface listed
/// without a unit means unit 0.
fn split_unit(zint: &str) -> (&str, &str) {
    zint.split_once('.').unwrap_or((zint, "0"))
}

/// Reduce `10.0.0.1/24` to `10.0.0.0/24`. A bare address is a host route.
fn network_cidr(address: &str) -> Option<String> {
    let net = IpNetwork::from_str(address).ok()?;
    Some(format!("{}/{}", net.network(), net.prefix()))
}
