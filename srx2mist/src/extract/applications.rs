use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use set_config_core::Statement;

use crate::classify::{classify, SrxStatement};
use crate::ledger::{Problem, ProblemLedger};

/// Field/value pairs of one `application` definition (`protocol`, `destination-port`, ...).
pub type AppRecord = IndexMap<String, String>;

/// A locally defined application or application-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppEntry {
    Single(AppRecord),
    /// Member records copied by value when the set line was read.
    Set(Vec<AppRecord>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Applications {
    entries: IndexMap<String, AppEntry>,
}

impl Applications {
    pub fn get(&self, name: &str) -> Option<&AppEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AppEntry)> {
        self.entries.iter()
    }

    fn set_field(&mut self, name: &str, field: &str, value: &str) {
        match self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| AppEntry::Single(AppRecord::new()))
        {
            AppEntry::Single(record) => {
                record.insert(field.to_string(), value.to_string());
            }
            AppEntry::Set(_) => {
                tracing::warn!("application {name} is already an application-set, ignoring {field}");
            }
        }
    }

    fn add_member(&mut self, set: &str, member: &str, ledger: &mut ProblemLedger) {
        let records = match self.entries.get(member) {
            Some(AppEntry::Single(record)) => vec![record.clone()],
            Some(AppEntry::Set(records)) => records.clone(),
            None => {
                ledger.record(Problem::ApplicationSetMember {
                    set: set.to_string(),
                    member: member.to_string(),
                });
                Vec::new()
            }
        };

        match self
            .entries
            .entry(set.to_string())
            .or_insert_with(|| AppEntry::Set(Vec::new()))
        {
            AppEntry::Set(list) => list.extend(records),
            AppEntry::Single(_) => {
                tracing::warn!("application-set {set} collides with an application of the same name");
            }
        }
    }
}

/// Collect applications and application-sets in one pass.
///
/// A set only sees members defined above it in the dump; later definitions are
/// not back-filled.
pub fn extract(statements: &[Statement], ledger: &mut ProblemLedger) -> Applications {
    let mut apps = Applications::default();
    for stmt in statements {
        match classify(stmt) {
            Some(SrxStatement::Application { name, field, value }) => {
                apps.set_field(name, field, value);
            }
            Some(SrxStatement::ApplicationSetMember { set, member }) => {
                apps.add_member(set, member, ledger);
            }
            _ => {}
        }
    }
    apps
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use set_config_core::parse;

    use super::{extract, AppEntry, AppRecord};
    use crate::ledger::ProblemLedger;

    fn record(pairs: &[(&str, &str)]) -> AppRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merges_fields_and_copies_set_members() {
        let stmts = parse(
            "set applications application ssh protocol tcp\n\
             set applications application ssh destination-port 22\n\
             set applications application-set admin application ssh\n",
        );
        let mut ledger = ProblemLedger::new();
        let apps = extract(&stmts, &mut ledger);

        let ssh = record(&[("protocol", "tcp"), ("destination-port", "22")]);
        assert_eq!(apps.get("ssh"), Some(&AppEntry::Single(ssh.clone())));
        assert_eq!(apps.get("admin"), Some(&AppEntry::Set(vec![ssh])));
        assert!(ledger.is_empty());
    }

    #[test]
    fn forward_reference_leaves_empty_set_and_ledger_entry() {
        let stmts = parse(
            "set applications application-set admin application later\n\
             set applications application later protocol tcp\n",
        );
        let mut ledger = ProblemLedger::new();
        let apps = extract(&stmts, &mut ledger);

        assert_eq!(apps.get("admin"), Some(&AppEntry::Set(Vec::new())));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.entries()[0].starts_with("Application: later"));
    }

    #[test]
    fn set_member_is_copied_by_value() {
        let stmts = parse(
            "set applications application web protocol tcp\n\
             set applications application-set bundle application web\n\
             set applications application web destination-port 80\n",
        );
        let mut ledger = ProblemLedger::new();
        let apps = extract(&stmts, &mut ledger);

        assert_eq!(
            apps.get("bundle"),
            Some(&AppEntry::Set(vec![record(&[("protocol", "tcp")])]))
        );
    }

    #[test]
    fn serializes_sets_as_lists() {
        let stmts = parse(
            "set applications application dns protocol udp\n\
             set applications application-set infra application dns\n",
        );
        let apps = extract(&stmts, &mut ProblemLedger::new());
        let json = serde_json::to_value(&apps).expect("serialize");
        assert_eq!(json["infra"][0]["protocol"], "udp");
        assert_eq!(json["dns"]["protocol"], "udp");
    }
}
