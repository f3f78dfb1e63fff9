//! Output persistence for analysis results.
//!
//! Each artifact is written independently: the cleaned dataset and the
//! student summary as CSV, the narrative report as text or JSON.

use anyhow::Result;
use csv::Writer;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{NarrativeSummary, SubjectStatistics, SummaryRow};
use crate::records::{self, CleanDataset};
use crate::report::render_text;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes every clean record.
///
/// `Gender` and `Semester` appear only if the input had them; `Attendance`
/// is always written, blank where unknown.
pub fn write_cleaned_csv(path: &Path, dataset: &CleanDataset) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = Writer::from_path(path)?;

    let with_gender = dataset.columns.has_gender();
    let with_semester = dataset.columns.has_semester();

    let mut header = vec![records::NAME, records::ROLL_NO];
    if with_gender {
        header.push(records::GENDER);
    }
    header.extend([records::SUBJECT, records::MARKS, records::ATTENDANCE]);
    if with_semester {
        header.push(records::SEMESTER);
    }
    writer.write_record(&header)?;

    for r in &dataset.records {
        let mut row = vec![r.name.clone(), r.roll_no.clone()];
        if with_gender {
            row.push(opt_cell(r.gender.as_deref()));
        }
        row.extend([r.subject.clone(), r.marks.to_string(), opt_cell(r.attendance)]);
        if with_semester {
            row.push(opt_cell(r.semester));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = dataset.len(), "Cleaned data exported");
    Ok(())
}

/// Subjects across all rows, in order of first appearance.
fn subject_columns(rows: &[SummaryRow]) -> Vec<String> {
    let mut subjects: Vec<String> = Vec::new();
    for (subject, _) in rows.iter().flat_map(|r| r.marks.iter()) {
        if !subjects.iter().any(|s| s == subject) {
            subjects.push(subject.to_string());
        }
    }
    subjects
}

/// Writes the summary table, one row per student.
///
/// Subject columns are the union over all students; a student without marks
/// for a subject gets a blank cell.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    ensure_parent(path)?;
    let subjects = subject_columns(rows);
    debug!(subjects = subjects.len(), "Summary subject columns");

    let mut writer = Writer::from_path(path)?;

    let mut header = vec!["Roll_No".to_string(), "Name".into(), "Gender".into()];
    header.extend(subjects.iter().map(|s| format!("Mark_{s}")));
    header.extend(["Total".into(), "Average".into(), "Grade".into()]);
    writer.write_record(&header)?;

    for r in rows {
        let mut row = vec![r.roll_no.clone(), r.name.clone(), opt_cell(r.gender.as_deref())];
        row.extend(subjects.iter().map(|s| opt_cell(r.marks.get(s))));
        row.extend([r.total.to_string(), format!("{:.2}", r.average), r.grade.clone()]);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Student summary exported");
    Ok(())
}

/// Writes per-subject statistics; an undefined standard deviation is blank.
pub fn write_subject_stats_csv(path: &Path, stats: &[SubjectStatistics]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Subject", "Count", "Mean", "Min", "Max", "StdDev"])?;

    for s in stats {
        writer.write_record([
            s.subject.clone(),
            s.count.to_string(),
            format!("{:.2}", s.mean),
            s.min.to_string(),
            s.max.to_string(),
            opt_cell(s.std_dev.map(|sd| format!("{sd:.2}"))),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_text_report(path: &Path, summary: &NarrativeSummary) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, render_text(summary))?;
    info!(path = %path.display(), "Text summary exported");
    Ok(())
}

pub fn write_json_report(path: &Path, summary: &NarrativeSummary) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(summary)?)?;
    info!(path = %path.display(), "JSON summary exported");
    Ok(())
}
