use indexmap::IndexMap;
use serde::Serialize;
use set_config_core::Statement;

use crate::classify::classify;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredLine {
    pub line: usize,
    pub text: String,
}

/// How the statements of a dump classify, per statement shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementInventory {
    pub statements: usize,
    /// Counts keyed by statement kind, in first-seen order.
    pub kinds: IndexMap<String, usize>,
    pub ignored: Vec<IgnoredLine>,
}

impl StatementInventory {
    pub fn recognized(&self) -> usize {
        self.kinds.values().sum()
    }
}

pub fn build_inventory(statements: &[Statement]) -> StatementInventory {
    let mut inv = StatementInventory {
        statements: statements.len(),
        ..StatementInventory::default()
    };
    for stmt in statements {
        match classify(stmt) {
            Some(shape) => *inv.kinds.entry(shape.kind().to_string()).or_default() += 1,
            None => inv.ignored.push(IgnoredLine {
                line: stmt.line,
                text: stmt.raw.clone(),
            }),
        }
    }
    inv
}

#[cfg(test)]
mod tests {
    use set_config_core::parse;

    use super::build_inventory;

    #[test]
    fn counts_kinds_and_keeps_ignored_lines() {
        let inv = build_inventory(&parse(
            "set version 21.4\n\
             set applications application ssh protocol tcp\n\
             set applications application ssh destination-port 22\n\
             set security zones security-zone trust interfaces ge-0/0/0.0\n\
             set security policies global policy deny-all then deny\n",
        ));
        assert_eq!(inv.statements, 5);
        assert_eq!(inv.kinds.get("application"), Some(&2));
        assert_eq!(inv.kinds.get("zone-interface"), Some(&1));
        assert_eq!(inv.recognized(), 3);
        assert_eq!(inv.ignored.len(), 2);
        assert_eq!(inv.ignored[0].line, 1);
        assert_eq!(inv.ignored[1].text, "set security policies global policy deny-all then deny");
    }
}
