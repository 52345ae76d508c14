use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use set_config_core::Statement;

use crate::classify::{classify, FamilySetting, InterfaceAttr, SrxStatement, UnitAttr};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub description: String,
    pub family: String,
    /// `ip/prefix` as configured, empty when the unit has none.
    pub address: String,
    #[serde(rename = "interface mode")]
    pub interface_mode: String,
    #[serde(rename = "vlan members")]
    pub vlan_members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub description: String,
    pub units: IndexMap<String, Unit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interfaces {
    entries: IndexMap<String, Interface>,
}

impl Interfaces {
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.entries.get(name)
    }

    pub fn unit(&self, name: &str, unit: &str) -> Option<&Unit> {
        self.get(name)?.units.get(unit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collect interfaces and their units. Records are created on first mention and
/// filled in by later lines for the same interface or unit.
pub fn extract(statements: &[Statement]) -> Interfaces {
    let mut interfaces = Interfaces::default();
    for stmt in statements {
        let Some(SrxStatement::Interface { name, attr }) = classify(stmt) else {
            continue;
        };
        let iface = interfaces.entries.entry(name.to_string()).or_default();
        match attr {
            InterfaceAttr::Description(text) => iface.description = text,
            InterfaceAttr::Unit { unit, attr } => {
                apply_unit(iface.units.entry(unit.to_string()).or_default(), attr);
            }
            InterfaceAttr::Other => {}
        }
    }
    interfaces
}

fn apply_unit(unit: &mut Unit, attr: UnitAttr<'_>) {
    match attr {
        UnitAttr::Description(text) => unit.description = text,
        UnitAttr::Family { family, setting } => {
            unit.family = family.to_string();
            match setting {
                FamilySetting::Address(ip) => unit.address = ip.to_string(),
                FamilySetting::VlanMembers(members) => unit.vlan_members = members.to_vec(),
                FamilySetting::InterfaceMode(mode) => unit.interface_mode = mode.to_string(),
                FamilySetting::Other => {}
            }
        }
        UnitAttr::Other => {}
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use set_config_core::parse;

    use super::{extract, Unit};

    #[test]
    fn enriches_units_across_lines() {
        let stmts = parse(
            "set interfaces ge-0/0/0 description inside lan\n\
             set interfaces ge-0/0/0 unit 0 description trust unit\n\
             set interfaces ge-0/0/0 unit 0 family inet address 10.0.0.1/24\n\
             set interfaces ge-0/0/2 unit 0 family ethernet-switching interface-mode trunk\n\
             set interfaces ge-0/0/2 unit 0 family ethernet-switching vlan members v10 v20\n",
        );
        let ifaces = extract(&stmts);

        let ge0 = ifaces.get("ge-0/0/0").expect("ge-0/0/0");
        assert_eq!(ge0.description, "inside lan");
        assert_eq!(
            ifaces.unit("ge-0/0/0", "0"),
            Some(&Unit {
                description: "trust unit".to_string(),
                family: "inet".to_string(),
                address: "10.0.0.1/24".to_string(),
                ..Unit::default()
            })
        );

        let sw = ifaces.unit("ge-0/0/2", "0").expect("switch unit");
        assert_eq!(sw.interface_mode, "trunk");
        assert_eq!(sw.vlan_members, vec!["v10", "v20"]);
    }

    #[test]
    fn unrelated_interface_lines_still_create_the_record() {
        let stmts = parse("set interfaces xe-0/0/1 mtu 9192\n");
        let ifaces = extract(&stmts);
        assert!(ifaces.get("xe-0/0/1").is_some());
        assert!(ifaces.unit("xe-0/0/1", "0").is_none());
    }

    #[test]
    fn serializes_with_device_keys() {
        let stmts = parse("set interfaces ge-0/0/2 unit 0 family ethernet-switching vlan members v10\n");
        let json = serde_json::to_value(extract(&stmts)).expect("serialize");
        assert_eq!(json["ge-0/0/2"]["units"]["0"]["vlan members"][0], "v10");
        assert_eq!(json["ge-0/0/2"]["units"]["0"]["interface mode"], "");
    }
}
