//! Report assembly: the summary table and the narrative class report, plus
//! the plain-text tables the CLI prints.

use std::fmt::Write;

use chrono::Utc;

use crate::analyzers::engine::StatisticsEngine;
use crate::analyzers::types::{
    NarrativeSummary, PerformerEntry, StudentProfile, SubjectStatistics, SummaryRow,
};
use crate::analyzers::utility::round2;
use crate::records::CleanRecord;

/// Composes engine output into report views.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    engine: StatisticsEngine,
}

impl ReportAssembler {
    pub fn new(engine: StatisticsEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &StatisticsEngine {
        &self.engine
    }

    /// One row per profile, in the order given.
    pub fn summary_table(&self, profiles: &[StudentProfile]) -> Vec<SummaryRow> {
        profiles
            .iter()
            .map(|p| SummaryRow {
                roll_no: p.roll_no.clone(),
                name: p.name.clone(),
                gender: p.gender.clone(),
                attendance: p.attendance,
                marks: p.marks.clone(),
                total: self.engine.total(p),
                average: round2(self.engine.average(p)),
                grade: self.engine.grade(p).to_string(),
            })
            .collect()
    }

    pub fn narrative_summary(&self, profiles: &[StudentProfile], top_n: usize) -> NarrativeSummary {
        let entry = |p: &&StudentProfile| PerformerEntry {
            roll_no: p.roll_no.clone(),
            name: p.name.clone(),
            average: self.engine.average(p),
        };

        NarrativeSummary {
            generated_at: Utc::now(),
            student_count: profiles.len(),
            class_average: self.engine.class_average(profiles),
            top: self.engine.top_n(profiles, top_n).iter().map(entry).collect(),
            bottom: self.engine.bottom_n(profiles, top_n).iter().map(entry).collect(),
        }
    }
}

/// Renders the plain-text performance report.
pub fn render_text(summary: &NarrativeSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Performance Summary Report");
    let _ = writeln!(output, "=========================");
    let _ = writeln!(output, "Total students: {}", summary.student_count);
    let _ = writeln!(
        output,
        "Class Average (Avg of student averages): {:.2}",
        summary.class_average
    );

    for (title, entries) in [
        ("Top performers", &summary.top),
        ("Bottom performers", &summary.bottom),
    ] {
        let _ = writeln!(output);
        let _ = writeln!(output, "{title}:");
        if entries.is_empty() {
            let _ = writeln!(output, "- none");
        }
        for e in entries {
            let _ = writeln!(output, "- {} | {} : Avg {:.2}", e.roll_no, e.name, e.average);
        }
    }

    output
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One line per clean record, under a header line.
pub fn render_preview(records: &[CleanRecord]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Name | Roll_No | Gender | Subject | Marks | Attendance | Semester");
    for r in records {
        let _ = writeln!(
            output,
            "{} | {} | {} | {} | {} | {} | {}",
            r.name,
            r.roll_no,
            or_dash(r.gender.as_deref()),
            r.subject,
            r.marks,
            or_dash(r.attendance),
            or_dash(r.semester),
        );
    }
    output
}

/// The per-student table followed by the grade distribution.
pub fn render_summary(rows: &[SummaryRow], distribution: &[(String, usize)]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Roll_No | Name | Gender | Marks | Total | Average | Grade");
    for row in rows {
        let marks = row
            .marks
            .iter()
            .map(|(subject, mark)| format!("{subject}={mark}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            output,
            "{} | {} | {} | {} | {} | {:.2} | {}",
            row.roll_no,
            row.name,
            or_dash(row.gender.as_deref()),
            marks,
            row.total,
            row.average,
            row.grade,
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Grade distribution:");
    if distribution.is_empty() {
        let _ = writeln!(output, "- none");
    }
    for (letter, count) in distribution {
        let _ = writeln!(output, "- {letter}: {count}");
    }
    output
}

/// Subject statistics, one subject per line. An undefined standard
/// deviation prints as `-`.
pub fn render_subject_stats(stats: &[SubjectStatistics]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Subject | Count | Mean | Min | Max | StdDev");
    for s in stats {
        let _ = writeln!(
            output,
            "{} | {} | {:.2} | {} | {} | {}",
            s.subject,
            s.count,
            s.mean,
            s.min,
            s.max,
            s.std_dev.map_or_else(|| "-".to_string(), |sd| format!("{sd:.2}")),
        );
    }
    output
}
