//! End-to-end translation: statements in, device model + Mist objects + ledger out.

use std::path::{Path, PathBuf};

use set_config_core::Statement;

use crate::compile::{compile, Compilation};
use crate::documents::{self, DocumentError};
use crate::extract::{extract_all, Extraction};
use crate::ledger::ProblemLedger;
use crate::resolve::{AppDefinitions, AppResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub extraction: Extraction,
    pub compilation: Compilation,
    pub ledger: ProblemLedger,
}

/// Extract every entity, then compile the Mist objects.
///
/// Applications and addresses are fully collected before any policy is
/// compiled, so resolution never depends on where a policy sits in the dump.
pub fn translate(statements: &[Statement], definitions: &AppDefinitions) -> Translation {
    let mut ledger = ProblemLedger::new();
    let extraction = extract_all(statements, &mut ledger);
    let compilation = compile(&extraction, &AppResolver::new(definitions), &mut ledger);
    Translation {
        extraction,
        compilation,
        ledger,
    }
}

impl Translation {
    /// Write all stage documents into `dir`, returning the paths in write order.
    pub fn write_documents(&self, dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
        let ex = &self.extraction;
        let co = &self.compilation;
        Ok(vec![
            documents::write_document(dir, documents::RAW_APPLICATIONS, &ex.applications)?,
            documents::write_document(dir, documents::RAW_ADDRESSES, &ex.addresses)?,
            documents::write_document(dir, documents::RAW_POLICIES, &ex.policies)?,
            documents::write_document(dir, documents::RAW_ZONES, &ex.zones)?,
            documents::write_document(dir, documents::RAW_INTERFACES, &ex.interfaces)?,
            documents::write_document(dir, documents::MIST_APPLICATIONS, &co.applications)?,
            documents::write_document(dir, documents::MIST_NETWORKS, &co.networks)?,
            documents::write_document(dir, documents::MIST_POLICIES, &co.policies)?,
            documents::write_document(dir, documents::PROBLEMS, &self.ledger)?,
        ])
    }
}
