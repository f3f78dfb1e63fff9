//! Row validation: turns a [`RawTable`] into a [`CleanDataset`].
//!
//! Structural problems (a mandatory column missing from the header) are fatal.
//! Row-level problems are a data-quality filter: the row is dropped and only
//! counted.

use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};
use crate::records::{CleanDataset, CleanRecord, RawRecord, RawTable};

/// Why a row was left out of the clean dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingIdentifier,
    NonNumericMarks,
    MarksOutOfRange,
}

/// Per-cause counts of dropped rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropCounts {
    pub missing_identifier: usize,
    pub non_numeric_marks: usize,
    pub marks_out_of_range: usize,
}

impl DropCounts {
    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingIdentifier => self.missing_identifier += 1,
            DropReason::NonNumericMarks => self.non_numeric_marks += 1,
            DropReason::MarksOutOfRange => self.marks_out_of_range += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_identifier + self.non_numeric_marks + self.marks_out_of_range
    }
}

/// Stateless row filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates every row of `table`, returning the surviving rows.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Schema`] when `Name`, `Roll_No`, `Subject` or
    /// `Marks` is absent from the header.
    pub fn validate(&self, table: &RawTable) -> Result<CleanDataset> {
        self.validate_with_counts(table).map(|(dataset, _)| dataset)
    }

    /// Like [`validate`](Self::validate), also returning why rows were dropped.
    pub fn validate_with_counts(&self, table: &RawTable) -> Result<(CleanDataset, DropCounts)> {
        let missing = table.columns.missing_mandatory();
        if !missing.is_empty() {
            return Err(AnalyzerError::Schema { missing });
        }

        let mut counts = DropCounts::default();
        let mut records = Vec::with_capacity(table.rows.len());

        for row in &table.rows {
            match clean_row(row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!(?reason, roll_no = ?row.roll_no, subject = ?row.subject, "Dropping row");
                    counts.record(reason);
                }
            }
        }

        info!(
            kept = records.len(),
            dropped = counts.total(),
            "CSV cleaned"
        );
        debug!(
            missing_identifier = counts.missing_identifier,
            non_numeric_marks = counts.non_numeric_marks,
            marks_out_of_range = counts.marks_out_of_range,
            "Drop breakdown"
        );

        let dataset = CleanDataset {
            columns: table.columns.clone(),
            records,
        };
        Ok((dataset, counts))
    }
}

fn clean_row(row: &RawRecord) -> std::result::Result<CleanRecord, DropReason> {
    let (Some(name), Some(roll_no), Some(subject)) = (
        non_blank(&row.name),
        non_blank(&row.roll_no),
        non_blank(&row.subject),
    ) else {
        return Err(DropReason::MissingIdentifier);
    };

    let marks = non_blank(&row.marks)
        .and_then(parse_number)
        .ok_or(DropReason::NonNumericMarks)?;

    if !(0.0..=100.0).contains(&marks) {
        return Err(DropReason::MarksOutOfRange);
    }

    Ok(CleanRecord {
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        gender: non_blank(&row.gender).map(str::to_string),
        subject: subject.to_string(),
        marks,
        attendance: non_blank(&row.attendance).and_then(parse_number),
        semester: non_blank(&row.semester).and_then(parse_semester),
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts integral text such as `2` or `2.0`.
fn parse_semester(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        parse_number(value)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    })
}
