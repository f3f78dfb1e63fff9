//! Run configuration.
//!
//! Every component receives its settings from an [`AnalyzerConfig`] value
//! instead of module-level constants. The defaults reproduce the stock
//! layout (`data/` for input, `output/` for artifacts).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analyzers::grade::GradeScale;
use crate::error::{AnalyzerError, Result};

/// Settings for one analysis run.
///
/// Stored as a JSON object on disk; any field may be omitted:
/// ```json
/// {
///   "output_dir": "reports",
///   "top_n": 5,
///   "grade_scale": {
///     "bands": [{ "min": 85, "letter": "A" }, { "min": 40, "letter": "P" }],
///     "fallback": "F"
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub cleaned_file: String,
    pub summary_file: String,
    pub subject_stats_file: String,
    pub report_file: String,
    pub report_json_file: String,
    pub dashboard_file: String,
    pub top_n: usize,
    pub grade_scale: GradeScale,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/sample_student_scores.csv"),
            output_dir: PathBuf::from("output"),
            cleaned_file: "cleaned_student_data.csv".into(),
            summary_file: "student_summary.csv".into(),
            subject_stats_file: "subject_statistics.csv".into(),
            report_file: "performance_summary.txt".into(),
            report_json_file: "performance_summary.json".into(),
            dashboard_file: "student_performance_dashboard.svg".into(),
            top_n: 3,
            grade_scale: GradeScale::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_json::from_str(&content)
            .map_err(|e| AnalyzerError::Config(format!("{}: {e}", path.display())))?;
        config.grade_scale.validate()?;
        Ok(config)
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    pub fn subject_stats_path(&self) -> PathBuf {
        self.output_dir.join(&self.subject_stats_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn report_json_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_json_file)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(&self.dashboard_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.top_n, 3);
        assert_eq!(
            config.summary_path(),
            PathBuf::from("output/student_summary.csv")
        );
        assert_eq!(config.grade_scale, GradeScale::default());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = temp_path("student_analyzer_test_config_partial.json");
        fs::write(&path, r#"{ "top_n": 5, "output_dir": "reports" }"#).unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.report_path(), PathBuf::from("reports/performance_summary.txt"));
        assert_eq!(config.grade_scale.grade(95.0), "A+");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_bad_grade_scale() {
        let path = temp_path("student_analyzer_test_config_bad_scale.json");
        fs::write(
            &path,
            r#"{ "grade_scale": { "bands": [{ "min": 40, "letter": "P" }, { "min": 85, "letter": "A" }], "fallback": "F" } }"#,
        )
        .unwrap();

        let err = AnalyzerConfig::load(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_fallback_reusing_band_letter() {
        let path = temp_path("student_analyzer_test_config_dup_letter.json");
        fs::write(
            &path,
            r#"{ "grade_scale": { "bands": [{ "min": 50, "letter": "P" }], "fallback": "P" } }"#,
        )
        .unwrap();

        let err = AnalyzerConfig::load(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let path = temp_path("student_analyzer_test_config_malformed.json");
        fs::write(&path, "{ top_n: ").unwrap();

        assert!(matches!(
            AnalyzerConfig::load(&path),
            Err(AnalyzerError::Config(_))
        ));

        fs::remove_file(&path).unwrap();
    }
}
