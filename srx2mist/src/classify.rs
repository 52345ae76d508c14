//! SRX statement grammar.
//!
//! Maps a tokenized [`Statement`] onto one of the statement shapes the
//! extractors understand. Classification is a literal word-prefix match
//! followed by positional field access:
//!
//! | Prefix                                   | Shape                                  |
//! |------------------------------------------|----------------------------------------|
//! | `set applications application`           | `<name> <field> <value>`               |
//! | `set applications application-set`       | `<set> application <member>`           |
//! | `set security address-book <book>`       | `address <name> <ip>`                  |
//! | `set security address-book <book>`       | `address-set <set> address <member>`   |
//! | `set security zones security-zone`       | `<zone> interfaces <iface> [...]`      |
//! | `set security zones security-zone`       | `<zone> host-inbound-traffic <p> <s>`  |
//! | `set interfaces`                         | `<iface> [unit <u>] ...`               |
//! | `set security policies from-zone`        | `<fz> to-zone <tz> policy <p> match/then ...` |
//!
//! Lines that match no prefix, or that are shorter than their shape requires,
//! classify to `None`. Configuration dumps carry many statement kinds that are
//! irrelevant to the translation, so this is not reported anywhere.

use set_config_core::Statement;

const APPLICATIONS: &[&str] = &["set", "applications"];
const ADDRESS_BOOK: &[&str] = &["set", "security", "address-book"];
const SECURITY_ZONE: &[&str] = &["set", "security", "zones", "security-zone"];
const INTERFACES: &[&str] = &["set", "interfaces"];
const POLICIES: &[&str] = &["set", "security", "policies", "from-zone"];

/// Address keywords that name a non-prefix address form.
const ADDRESS_FORMS: &[&str] = &["dns-name", "range-address", "wildcard-address"];

/// A recognized SRX statement with its positional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrxStatement<'a> {
    Application {
        name: &'a str,
        field: &'a str,
        value: &'a str,
    },
    ApplicationSetMember {
        set: &'a str,
        member: &'a str,
    },
    Address {
        name: &'a str,
        ip: &'a str,
    },
    /// An address defined through a form other than an IP prefix.
    AddressForm {
        name: &'a str,
        form: &'a str,
    },
    AddressSetMember {
        set: &'a str,
        member: &'a str,
    },
    ZoneInterface {
        zone: &'a str,
        interface: &'a str,
        /// Per-interface `host-inbound-traffic` follows the interface name.
        host_inbound: bool,
    },
    ZoneHostInbound {
        zone: &'a str,
        protocol: &'a str,
        service: &'a str,
    },
    /// Any other statement under a zone; only declares the zone.
    Zone {
        zone: &'a str,
    },
    Interface {
        name: &'a str,
        attr: InterfaceAttr<'a>,
    },
    PolicyMatch {
        from_zone: &'a str,
        to_zone: &'a str,
        policy: &'a str,
        match_type: &'a str,
        criteria: &'a str,
    },
    PolicyThen {
        from_zone: &'a str,
        to_zone: &'a str,
        policy: &'a str,
        action: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAttr<'a> {
    Description(String),
    Unit { unit: &'a str, attr: UnitAttr<'a> },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitAttr<'a> {
    Description(String),
    Family {
        family: &'a str,
        setting: FamilySetting<'a>,
    },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilySetting<'a> {
    Address(&'a str),
    VlanMembers(&'a [String]),
    InterfaceMode(&'a str),
    Other,
}

impl SrxStatement<'_> {
    /// Stable label used when counting statements per shape.
    pub fn kind(&self) -> &'static str {
        match self {
            SrxStatement::Application { .. } => "application",
            SrxStatement::ApplicationSetMember { .. } => "application-set",
            SrxStatement::Address { .. } | SrxStatement::AddressForm { .. } => "address",
            SrxStatement::AddressSetMember { .. } => "address-set",
            SrxStatement::ZoneInterface { .. } => "zone-interface",
            SrxStatement::ZoneHostInbound { .. } => "zone-host-inbound-traffic",
            SrxStatement::Zone { .. } => "zone",
            SrxStatement::Interface { .. } => "interface",
            SrxStatement::PolicyMatch { .. } => "policy-match",
            SrxStatement::PolicyThen { .. } => "policy-then",
        }
    }
}

/// Classify one statement line.
pub fn classify(stmt: &Statement) -> Option<SrxStatement<'_>> {
    if stmt.starts_with(APPLICATIONS) {
        classify_application(stmt)
    } else if stmt.starts_with(ADDRESS_BOOK) {
        classify_address(stmt)
    } else if stmt.starts_with(SECURITY_ZONE) {
        classify_zone(stmt)
    } else if stmt.starts_with(POLICIES) {
        classify_policy(stmt)
    } else if stmt.starts_with(INTERFACES) {
        classify_interface(stmt)
    } else {
        None
    }
}

fn classify_application(stmt: &Statement) -> Option<SrxStatement<'_>> {
    if stmt.len() < 6 {
        return None;
    }
    match stmt.field(2)? {
        "application" => Some(SrxStatement::Application {
            name: stmt.field(3)?,
            field: stmt.field(4)?,
            value: stmt.field(5)?,
        }),
        "application-set" if stmt.field(4) == Some("application") => {
            Some(SrxStatement::ApplicationSetMember {
                set: stmt.field(3)?,
                member: stmt.field(5)?,
            })
        }
        _ => None,
    }
}

fn classify_address(stmt: &Statement) -> Option<SrxStatement<'_>> {
    match stmt.field(4)? {
        "address-set" if stmt.len() >= 8 => Some(SrxStatement::AddressSetMember {
            set: stmt.field(5)?,
            member: stmt.field(7)?,
        }),
        "address" if stmt.len() >= 7 => {
            let name = stmt.field(5)?;
            match stmt.field(6)? {
                "description" => None,
                form if ADDRESS_FORMS.contains(&form) => {
                    Some(SrxStatement::AddressForm { name, form })
                }
                ip => Some(SrxStatement::Address { name, ip }),
            }
        }
        _ => None,
    }
}

fn classify_zone(stmt: &Statement) -> Option<SrxStatement<'_>> {
    let zone = stmt.field(4)?;
    let shaped = match stmt.field(5) {
        Some("interfaces") if stmt.len() >= 7 => Some(SrxStatement::ZoneInterface {
            zone,
            interface: stmt.field(6)?,
            host_inbound: stmt.field(7) == Some("host-inbound-traffic"),
        }),
        Some("host-inbound-traffic") if stmt.len() >= 8 => Some(SrxStatement::ZoneHostInbound {
            zone,
            protocol: stmt.field(6)?,
            service: stmt.field(7)?,
        }),
        _ => None,
    };
    Some(shaped.unwrap_or(SrxStatement::Zone { zone }))
}

fn classify_interface(stmt: &Statement) -> Option<SrxStatement<'_>> {
    let name = stmt.field(2)?;
    let attr = match stmt.field(3)? {
        "description" => InterfaceAttr::Description(stmt.rest_joined(4)),
        "unit" => InterfaceAttr::Unit {
            unit: stmt.field(4)?,
            attr: classify_unit(stmt),
        },
        _ => InterfaceAttr::Other,
    };
    Some(SrxStatement::Interface { name, attr })
}

fn classify_unit(stmt: &Statement) -> UnitAttr<'_> {
    match stmt.field(5) {
        Some("description") => UnitAttr::Description(stmt.rest_joined(6)),
        Some("family") => match stmt.field(6) {
            Some(family) => UnitAttr::Family {
                family,
                setting: classify_family(stmt),
            },
            None => UnitAttr::Other,
        },
        _ => UnitAttr::Other,
    }
}

fn classify_family(stmt: &Statement) -> FamilySetting<'_> {
    match (stmt.field(7), stmt.field(8)) {
        (Some("address"), Some(ip)) => FamilySetting::Address(ip),
        (Some("vlan"), _) => FamilySetting::VlanMembers(stmt.rest(9)),
        (Some("interface-mode"), Some(mode)) => FamilySetting::InterfaceMode(mode),
        _ => FamilySetting::Other,
    }
}

fn classify_policy(stmt: &Statement) -> Option<SrxStatement<'_>> {
    let from_zone = stmt.field(4)?;
    let to_zone = stmt.field(6)?;
    let policy = stmt.field(8)?;
    match stmt.field(9)? {
        "match" if stmt.len() >= 12 => Some(SrxStatement::PolicyMatch {
            from_zone,
            to_zone,
            policy,
            match_type: stmt.field(10)?,
            criteria: stmt.field(11)?,
        }),
        "then" if stmt.len() >= 11 => Some(SrxStatement::PolicyThen {
            from_zone,
            to_zone,
            policy,
            action: stmt.field(10)?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use set_config_core::Statement;

    use super::{classify, FamilySetting, InterfaceAttr, SrxStatement, UnitAttr};

    fn stmt(text: &str) -> Statement {
        Statement::new(1, text)
    }

    #[test]
    fn classifies_application_field() {
        let line = stmt("set applications application ssh destination-port 22\n");
        assert_eq!(
            classify(&line),
            Some(SrxStatement::Application {
                name: "ssh",
                field: "destination-port",
                value: "22"
            })
        );
    }

    #[test]
    fn classifies_address_set_member() {
        let line = stmt("set security address-book global address-set servers address web");
        assert_eq!(
            classify(&line),
            Some(SrxStatement::AddressSetMember {
                set: "servers",
                member: "web"
            })
        );
    }

    #[test]
    fn address_description_is_not_an_ip() {
        let line = stmt("set security address-book global address web description frontend");
        assert_eq!(classify(&line), None);
    }

    #[test]
    fn flags_non_prefix_address_forms() {
        let line = stmt("set security address-book global address cdn dns-name cdn.example.net");
        assert_eq!(
            classify(&line),
            Some(SrxStatement::AddressForm {
                name: "cdn",
                form: "dns-name"
            })
        );
    }

    #[test]
    fn zone_interface_with_trailing_host_inbound() {
        let line = stmt(
            "set security zones security-zone trust interfaces irb.10 host-inbound-traffic system-services dhcp",
        );
        assert_eq!(
            classify(&line),
            Some(SrxStatement::ZoneInterface {
                zone: "trust",
                interface: "irb.10",
                host_inbound: true
            })
        );
    }

    #[test]
    fn short_zone_line_only_declares_zone() {
        let line = stmt("set security zones security-zone dmz interfaces");
        assert_eq!(classify(&line), Some(SrxStatement::Zone { zone: "dmz" }));
    }

    #[test]
    fn interface_vlan_members_take_the_remainder() {
        let line = stmt("set interfaces ge-0/0/2 unit 0 family ethernet-switching vlan members v10 v20");
        let Some(SrxStatement::Interface { name, attr }) = classify(&line) else {
            panic!("expected interface statement");
        };
        assert_eq!(name, "ge-0/0/2");
        let InterfaceAttr::Unit {
            unit,
            attr: UnitAttr::Family { family, setting },
        } = attr
        else {
            panic!("expected unit family");
        };
        assert_eq!(unit, "0");
        assert_eq!(family, "ethernet-switching");
        match setting {
            FamilySetting::VlanMembers(members) => assert_eq!(members, ["v10", "v20"]),
            other => panic!("unexpected setting: {other:?}"),
        }
    }

    #[test]
    fn policy_then_and_short_lines() {
        let then = stmt("set security policies from-zone trust to-zone untrust policy p1 then permit");
        assert_eq!(
            classify(&then),
            Some(SrxStatement::PolicyThen {
                from_zone: "trust",
                to_zone: "untrust",
                policy: "p1",
                action: "permit"
            })
        );
        let short = stmt("set security policies from-zone trust to-zone untrust policy p1 match source-address");
        assert_eq!(classify(&short), None);
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert_eq!(classify(&stmt("set system host-name fw1")), None);
        assert_eq!(classify(&stmt("set security policies global policy x then deny")), None);
        assert_eq!(classify(&stmt("set applications application ssh")), None);
    }
}
