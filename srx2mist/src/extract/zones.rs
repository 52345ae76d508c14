use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use set_config_core::Statement;

use crate::classify::{classify, SrxStatement};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub interfaces: Vec<String>,
    /// `"<protocol> <service>"` pairs allowed to the device itself.
    #[serde(rename = "host-inbound-traffic")]
    pub host_inbound_traffic: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zones {
    entries: IndexMap<String, Zone>,
}

impl Zones {
    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn zone_mut(&mut self, name: &str) -> &mut Zone {
        self.entries.entry(name.to_string()).or_default()
    }
}

pub fn extract(statements: &[Statement]) -> Zones {
    let mut zones = Zones::default();
    for stmt in statements {
        match classify(stmt) {
            Some(SrxStatement::ZoneInterface {
                zone,
                interface,
                host_inbound,
            }) => {
                push_unique(&mut zones.zone_mut(zone).interfaces, interface.to_string());
                if host_inbound {
                    // Per-interface host-inbound-traffic has no Mist counterpart yet.
                    tracing::debug!("ignoring host-inbound-traffic on {zone}/{interface}");
                }
            }
            Some(SrxStatement::ZoneHostInbound {
                zone,
                protocol,
                service,
            }) => {
                push_unique(
                    &mut zones.zone_mut(zone).host_inbound_traffic,
                    format!("{protocol} {service}"),
                );
            }
            Some(SrxStatement::Zone { zone }) => {
                zones.zone_mut(zone);
            }
            _ => {}
        }
    }
    zones
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
