//! Row-level record types: raw input rows and the rows that survive validation.

use serde::{Deserialize, Serialize};

pub const NAME: &str = "Name";
pub const ROLL_NO: &str = "Roll_No";
pub const GENDER: &str = "Gender";
pub const SUBJECT: &str = "Subject";
pub const MARKS: &str = "Marks";
pub const ATTENDANCE: &str = "Attendance";
pub const SEMESTER: &str = "Semester";

/// Columns that must exist in every input file.
pub const MANDATORY_COLUMNS: [&str; 4] = [NAME, ROLL_NO, SUBJECT, MARKS];

/// One input row exactly as read. Every field is optional text; a column
/// that is absent from the file deserializes to `None` for every row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Roll_No")]
    pub roll_no: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Marks")]
    pub marks: Option<String>,
    #[serde(rename = "Attendance")]
    pub attendance: Option<String>,
    #[serde(rename = "Semester")]
    pub semester: Option<String>,
}

/// The header row of an input file.
///
/// Records which columns exist at all, as opposed to which cells are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSet {
    headers: Vec<String>,
}

impl ColumnSet {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// The first header that appears more than once, if any.
    pub fn duplicate(&self) -> Option<&str> {
        self.headers
            .iter()
            .enumerate()
            .find(|(i, h)| self.headers[..*i].contains(*h))
            .map(|(_, h)| h.as_str())
    }

    pub fn missing_mandatory(&self) -> Vec<String> {
        MANDATORY_COLUMNS
            .iter()
            .filter(|c| !self.has(c))
            .map(|c| c.to_string())
            .collect()
    }

    pub fn has_gender(&self) -> bool {
        self.has(GENDER)
    }

    pub fn has_attendance(&self) -> bool {
        self.has(ATTENDANCE)
    }

    pub fn has_semester(&self) -> bool {
        self.has(SEMESTER)
    }
}

/// A parsed input file: its header set and every data row.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: ColumnSet,
    pub rows: Vec<RawRecord>,
}

/// A row that passed validation: identifiers non-empty, marks finite and in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    pub name: String,
    pub roll_no: String,
    pub gender: Option<String>,
    pub subject: String,
    pub marks: f64,
    pub attendance: Option<f64>,
    pub semester: Option<i64>,
}

impl From<&CleanRecord> for RawRecord {
    fn from(r: &CleanRecord) -> Self {
        RawRecord {
            name: Some(r.name.clone()),
            roll_no: Some(r.roll_no.clone()),
            gender: r.gender.clone(),
            subject: Some(r.subject.clone()),
            marks: Some(r.marks.to_string()),
            attendance: r.attendance.map(|a| a.to_string()),
            semester: r.semester.map(|s| s.to_string()),
        }
    }
}

/// The validated dataset for one run. Duplicate (roll_no, subject) rows are kept.
#[derive(Debug, Clone, Default)]
pub struct CleanDataset {
    pub columns: ColumnSet,
    pub records: Vec<CleanRecord>,
}

impl CleanDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Turns the dataset back into raw rows with the same columns.
    pub fn to_raw_table(&self) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: self.records.iter().map(RawRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mandatory_columns() {
        let columns = ColumnSet::new(["Name", "Marks", "Gender"]);
        assert_eq!(columns.missing_mandatory(), vec!["Roll_No", "Subject"]);
        assert!(columns.has_gender());
        assert!(!columns.has_attendance());
    }

    #[test]
    fn test_complete_header_has_nothing_missing() {
        let columns = ColumnSet::new(["Roll_No", "Subject", "Name", "Marks"]);
        assert!(columns.missing_mandatory().is_empty());
        assert_eq!(columns.duplicate(), None);
    }

    #[test]
    fn test_duplicate_header_is_found() {
        let columns = ColumnSet::new(["Name", "Roll_No", "Marks", "Subject", "Marks"]);
        assert_eq!(columns.duplicate(), Some("Marks"));
    }

    #[test]
    fn test_clean_record_converts_back_to_raw() {
        let clean = CleanRecord {
            name: "Aman Kumar".into(),
            roll_no: "23BCA001".into(),
            gender: None,
            subject: "Math".into(),
            marks: 78.5,
            attendance: Some(92.0),
            semester: None,
        };
        let raw = RawRecord::from(&clean);
        assert_eq!(raw.marks.as_deref(), Some("78.5"));
        assert_eq!(raw.attendance.as_deref(), Some("92"));
        assert_eq!(raw.gender, None);
    }
}
