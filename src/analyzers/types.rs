//! Data types produced by aggregation, statistics, and reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Subject → score mapping with unique keys, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marks(Vec<(String, f64)>);

impl Marks {
    /// Sets the score for `subject`, overwriting any earlier value in place.
    /// Returns the previous score if there was one.
    pub fn insert(&mut self, subject: &str, score: f64) -> Option<f64> {
        match self.0.iter_mut().find(|(s, _)| s == subject) {
            Some((_, existing)) => Some(std::mem::replace(existing, score)),
            None => {
                self.0.push((subject.to_string(), score));
                None
            }
        }
    }

    pub fn get(&self, subject: &str) -> Option<f64> {
        self.0.iter().find(|(s, _)| s == subject).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(s, v)| (s.as_str(), *v))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One student, built from every clean record sharing a roll number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfile {
    pub roll_no: String,
    pub name: String,
    pub gender: Option<String>,
    pub attendance: Option<f64>,
    pub marks: Marks,
}

/// Mark dispersion for a single subject.
///
/// `std_dev` is the sample standard deviation and is `None` when the subject
/// has a single record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectStatistics {
    pub subject: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: Option<f64>,
}

/// One row of the student summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub roll_no: String,
    pub name: String,
    pub gender: Option<String>,
    pub attendance: Option<f64>,
    /// Only the subjects this student has marks for.
    pub marks: Marks,
    pub total: f64,
    /// Rounded to two decimals.
    pub average: f64,
    pub grade: String,
}

/// A top or bottom performer as listed in the narrative report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerEntry {
    pub roll_no: String,
    pub name: String,
    pub average: f64,
}

/// Class-level summary: student count, class average, best and worst students.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeSummary {
    pub generated_at: DateTime<Utc>,
    pub student_count: usize,
    /// Mean of per-student averages, not of individual marks.
    pub class_average: f64,
    pub top: Vec<PerformerEntry>,
    pub bottom: Vec<PerformerEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_last_write_wins_in_place() {
        let mut marks = Marks::default();
        assert_eq!(marks.insert("Math", 60.0), None);
        marks.insert("Physics", 70.0);
        assert_eq!(marks.insert("Math", 80.0), Some(60.0));

        let subjects: Vec<_> = marks.iter().collect();
        assert_eq!(subjects, vec![("Math", 80.0), ("Physics", 70.0)]);
        assert_eq!(marks.len(), 2);
    }

    #[test]
    fn test_marks_get_missing_subject() {
        let marks = Marks::default();
        assert!(marks.is_empty());
        assert_eq!(marks.get("Math"), None);
    }
}
