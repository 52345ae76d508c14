use serde::Serialize;

use crate::ledger::ProblemClass;
use crate::pipeline::Translation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranslationSummary {
    pub applications: usize,
    pub addresses: usize,
    pub zones: usize,
    pub interfaces: usize,
    pub policies: usize,
    pub mist_applications: usize,
    pub duplicate_applications: usize,
    pub renamed_applications: usize,
    pub interface_networks: usize,
    pub indirect_networks: usize,
    pub service_policies: usize,
    pub unresolved: usize,
    pub unsupported: usize,
}

pub fn summarize(t: &Translation) -> TranslationSummary {
    let ex = &t.extraction;
    let co = &t.compilation;
    TranslationSummary {
        applications: ex.applications.len(),
        addresses: ex.addresses.len(),
        zones: ex.zones.len(),
        interfaces: ex.interfaces.len(),
        policies: ex.policies.policy_count(),
        mist_applications: co.applications.len(),
        duplicate_applications: co.stats.fully_duplicate,
        renamed_applications: co.stats.renamed,
        interface_networks: co.networks.interface_count(),
        indirect_networks: co.networks.indirect_count(),
        service_policies: co.policies.len(),
        unresolved: t.ledger.count(ProblemClass::Unresolved),
        unsupported: t.ledger.count(ProblemClass::Unsupported),
    }
}

pub fn render(summary: TranslationSummary) -> String {
    format!(
        "ingest_summary applications={} addresses={} zones={} interfaces={} policies={}\n\
         mist_summary applications={} duplicates={} renamed={} interface_nets={} indirect_nets={} service_policies={}\n\
         problems unresolved={} unsupported={}",
        summary.applications,
        summary.addresses,
        summary.zones,
        summary.interfaces,
        summary.policies,
        summary.mist_applications,
        summary.duplicate_applications,
        summary.renamed_applications,
        summary.interface_networks,
        summary.indirect_networks,
        summary.service_policies,
        summary.unresolved,
        summary.unsupported
    )
}
