//! One batch analysis: read → validate → aggregate.
//!
//! Each [`Pipeline::run`] returns its own [`AnalysisRun`]; nothing is shared
//! between runs.

use std::path::Path;

use tracing::{info, warn};

use crate::analyzers::aggregate::{StudentAggregator, StudentRegistry};
use crate::analyzers::engine::StatisticsEngine;
use crate::analyzers::types::{NarrativeSummary, SubjectStatistics, SummaryRow};
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::parser::read_csv;
use crate::records::{CleanDataset, RawTable};
use crate::report::ReportAssembler;
use crate::validator::{DropCounts, RecordValidator};

pub struct Pipeline {
    validator: RecordValidator,
    aggregator: StudentAggregator,
    assembler: ReportAssembler,
    top_n: usize,
}

/// The result of one pipeline run.
pub struct AnalysisRun {
    pub dataset: CleanDataset,
    pub drops: DropCounts,
    pub registry: StudentRegistry,
    assembler: ReportAssembler,
    top_n: usize,
}

impl Pipeline {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            validator: RecordValidator::new(),
            aggregator: StudentAggregator::new(),
            assembler: ReportAssembler::new(StatisticsEngine::new(config.grade_scale.clone())),
            top_n: config.top_n,
        }
    }

    /// Runs the pipeline over an already parsed table.
    ///
    /// # Errors
    ///
    /// Fails only when a mandatory column is missing; nothing is aggregated then.
    pub fn run_table(&self, table: &RawTable) -> Result<AnalysisRun> {
        let (dataset, drops) = self.validator.validate_with_counts(table)?;
        if dataset.is_empty() {
            warn!("No rows survived validation");
        }

        let registry = self.aggregator.aggregate(&dataset.records);

        Ok(AnalysisRun {
            dataset,
            drops,
            registry,
            assembler: self.assembler.clone(),
            top_n: self.top_n,
        })
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn run(&self, path: &Path) -> Result<AnalysisRun> {
        let table = read_csv(path)?;
        let run = self.run_table(&table)?;
        info!(
            records = run.dataset.len(),
            students = run.registry.len(),
            "Analysis complete"
        );
        Ok(run)
    }
}

impl AnalysisRun {
    pub fn engine(&self) -> &StatisticsEngine {
        self.assembler.engine()
    }

    pub fn summary_table(&self) -> Vec<SummaryRow> {
        self.assembler.summary_table(self.registry.profiles())
    }

    pub fn narrative_summary(&self) -> NarrativeSummary {
        self.assembler
            .narrative_summary(self.registry.profiles(), self.top_n)
    }

    pub fn subject_statistics(&self) -> Vec<SubjectStatistics> {
        self.engine().subject_statistics(&self.dataset.records)
    }
}
