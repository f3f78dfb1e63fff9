//! Built-in demo dataset, written when no input file exists yet.

use anyhow::Result;
use csv::Writer;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    name: &'static str,
    #[serde(rename = "Roll_No")]
    roll_no: &'static str,
    gender: &'static str,
    subject: &'static str,
    marks: u8,
    attendance: u8,
    semester: u8,
}

const STUDENTS: [(&str, &str, &str, u8, [u8; 3]); 4] = [
    ("Aman Kumar", "23BCA001", "M", 92, [78, 72, 81]),
    ("Nisha Sharma", "23BCA002", "F", 95, [88, 91, 85]),
    ("Ravi Verma", "23BCA003", "M", 68, [54, 47, 50]),
    ("Priya Singh", "23BCA004", "F", 98, [96, 94, 97]),
];

const SUBJECTS: [&str; 3] = ["Math", "Physics", "Chemistry"];

/// Writes the sample dataset to `path` unless a file is already there.
///
/// Returns `true` if a new file was written.
pub fn ensure_sample_data(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;
    for (name, roll_no, gender, attendance, marks) in STUDENTS {
        for (subject, mark) in SUBJECTS.into_iter().zip(marks) {
            writer.serialize(SampleRow {
                name,
                roll_no,
                gender,
                subject,
                marks: mark,
                attendance,
                semester: 1,
            })?;
        }
    }
    writer.flush()?;

    info!(path = %path.display(), "Sample dataset created");
    Ok(true)
}
