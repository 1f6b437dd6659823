//! Raw rows to the canonical, enriched event table.

use tracing::debug;

use crate::enrich::Enricher;
use crate::events::EventTable;
use crate::normalize::Normalizer;
use crate::raw::RawTable;

/// Runs the normalizer then the enricher.
pub struct Pipeline {
    normalizer: Normalizer,
    enricher: Enricher,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            enricher: Enricher::new(),
        }
    }

    /// Builds the canonical table. Never fails; empty in, empty out.
    pub fn process(&self, raw: &RawTable) -> EventTable {
        let normalized = self.normalizer.normalize(raw);
        let table = self.enricher.enrich_table(normalized);
        debug!(
            raw_columns = raw.columns().len(),
            rows = table.len(),
            "Built canonical event table"
        );
        table
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
