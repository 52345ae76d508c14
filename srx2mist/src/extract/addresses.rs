use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use set_config_core::Statement;

use crate::classify::{classify, SrxStatement};
use crate::ledger::{Problem, ProblemLedger};

/// Address-book entries: name to the IP prefixes it stands for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addresses {
    entries: IndexMap<String, Vec<String>>,
}

impl Addresses {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the address table in two passes.
///
/// Pass one records every direct `address <name> <ip>` entry and buffers the
/// address-set lines. Pass two expands each buffered set line against the table
/// as it stands, which includes sets expanded earlier in the same pass. A member
/// that cannot be found is recorded in the ledger and skipped; the rest of the
/// set is still built.
pub fn extract(statements: &[Statement], ledger: &mut ProblemLedger) -> Addresses {
    let mut addresses = Addresses::default();
    let mut set_lines = Vec::new();

    for stmt in statements {
        match classify(stmt) {
            Some(SrxStatement::Address { name, ip }) => {
                addresses
                    .entries
                    .insert(name.to_string(), vec![ip.to_string()]);
            }
            Some(SrxStatement::AddressForm { name, form }) => {
                ledger.record(Problem::UnsupportedAddressForm {
                    name: name.to_string(),
                    form: form.to_string(),
                });
            }
            Some(SrxStatement::AddressSetMember { .. }) => set_lines.push(stmt),
            _ => {}
        }
    }

    for stmt in set_lines {
        let Some(SrxStatement::AddressSetMember { set, member }) = classify(stmt) else {
            continue;
        };
        let Some(ips) = addresses.entries.get(member).cloned() else {
            ledger.record(Problem::AddressSetMember {
                set: set.to_string(),
                member: member.to_string(),
            });
            continue;
        };
        addresses
            .entries
            .entry(set.to_string())
            .or_default()
            .extend(ips);
    }

    addresses
}
