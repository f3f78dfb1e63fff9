use std::collections::BTreeMap;

use crate::analyzers::grade::GradeScale;
use crate::analyzers::types::{StudentProfile, SubjectStatistics};
use crate::analyzers::utility::{mean, sample_stddev};
use crate::records::CleanRecord;

/// Stateless calculator for per-student and per-subject metrics.
///
/// Holds only the grade scale. Every method is a pure function of its
/// arguments and returns zero or empty values for empty input.
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    scale: GradeScale,
}

impl StatisticsEngine {
    pub fn new(scale: GradeScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn total(&self, profile: &StudentProfile) -> f64 {
        profile.marks.values().sum()
    }

    /// Returns 0.0 for a profile without marks.
    pub fn average(&self, profile: &StudentProfile) -> f64 {
        if profile.marks.is_empty() {
            0.0
        } else {
            self.total(profile) / profile.marks.len() as f64
        }
    }

    pub fn grade(&self, profile: &StudentProfile) -> &str {
        self.scale.grade(self.average(profile))
    }

    /// Profiles sorted by average, highest first. Ties keep input order.
    pub fn ranked<'a>(&self, profiles: &'a [StudentProfile]) -> Vec<&'a StudentProfile> {
        let mut sorted: Vec<&StudentProfile> = profiles.iter().collect();
        sorted.sort_by(|a, b| self.average(b).total_cmp(&self.average(a)));
        sorted
    }

    /// The `n` highest averages, highest first.
    pub fn top_n<'a>(&self, profiles: &'a [StudentProfile], n: usize) -> Vec<&'a StudentProfile> {
        self.ranked(profiles).into_iter().take(n).collect()
    }

    /// The `n` lowest averages, lowest first.
    pub fn bottom_n<'a>(
        &self,
        profiles: &'a [StudentProfile],
        n: usize,
    ) -> Vec<&'a StudentProfile> {
        self.ranked(profiles).into_iter().rev().take(n).collect()
    }

    /// Mean of per-student averages.
    pub fn class_average(&self, profiles: &[StudentProfile]) -> f64 {
        let averages: Vec<f64> = profiles.iter().map(|p| self.average(p)).collect();
        mean(&averages)
    }

    /// Student count per grade letter, best grade first. Letters nobody
    /// earned are left out.
    pub fn grade_distribution(&self, profiles: &[StudentProfile]) -> Vec<(String, usize)> {
        self.scale.distribution(profiles.iter().map(|p| self.grade(p)))
    }

    /// Mean, min, max and sample standard deviation of marks per subject,
    /// ordered by subject name.
    pub fn subject_statistics(&self, records: &[CleanRecord]) -> Vec<SubjectStatistics> {
        let mut by_subject: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            by_subject
                .entry(record.subject.as_str())
                .or_default()
                .push(record.marks);
        }

        by_subject
            .into_iter()
            .map(|(subject, marks)| {
                let avg = mean(&marks);
                SubjectStatistics {
                    subject: subject.to_string(),
                    count: marks.len(),
                    mean: avg,
                    min: marks.iter().copied().fold(f64::INFINITY, f64::min),
                    max: marks.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    std_dev: sample_stddev(&marks, avg),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Marks;

    fn profile(roll_no: &str, marks: &[(&str, f64)]) -> StudentProfile {
        let mut m = Marks::default();
        for (subject, score) in marks {
            m.insert(subject, *score);
        }
        StudentProfile {
            roll_no: roll_no.into(),
            name: format!("Student {roll_no}"),
            gender: None,
            attendance: None,
            marks: m,
        }
    }

    fn rec(subject: &str, marks: f64) -> CleanRecord {
        CleanRecord {
            name: "Aman Kumar".into(),
            roll_no: "23BCA001".into(),
            gender: None,
            subject: subject.into(),
            marks,
            attendance: None,
            semester: None,
        }
    }

    fn rolls(list: &[&StudentProfile]) -> Vec<String> {
        list.iter().map(|p| p.roll_no.clone()).collect()
    }

    #[test]
    fn test_two_subject_average_and_grade() {
        let engine = StatisticsEngine::default();
        let p = profile("23BCA001", &[("Math", 78.0), ("Physics", 72.0)]);

        assert_eq!(engine.total(&p), 150.0);
        assert_eq!(engine.average(&p), 75.0);
        assert_eq!(engine.grade(&p), "B");
    }

    #[test]
    fn test_empty_profile_is_zero() {
        let engine = StatisticsEngine::default();
        let p = profile("23BCA001", &[]);

        assert_eq!(engine.total(&p), 0.0);
        assert_eq!(engine.average(&p), 0.0);
        assert_eq!(engine.grade(&p), "F");
    }

    #[test]
    fn test_average_is_total_over_count() {
        let engine = StatisticsEngine::default();
        let p = profile("23BCA001", &[("Math", 81.0), ("Physics", 47.5), ("Chemistry", 99.0)]);
        assert_eq!(engine.average(&p), engine.total(&p) / 3.0);
    }

    #[test]
    fn test_top_and_bottom_with_four_students() {
        let engine = StatisticsEngine::default();
        let profiles = vec![
            profile("r50", &[("Math", 50.0)]),
            profile("r96", &[("Math", 96.0)]),
            profile("r34", &[("Math", 34.0)]),
            profile("r90", &[("Math", 90.0)]),
        ];

        let top = engine.top_n(&profiles, 3);
        let bottom = engine.bottom_n(&profiles, 3);

        assert_eq!(rolls(&top), vec!["r96", "r90", "r50"]);
        assert_eq!(rolls(&bottom), vec!["r34", "r50", "r90"]);

        let overlap = top.iter().filter(|t| bottom.contains(t)).count();
        assert_eq!(overlap, 2);
    }

    #[test]
    fn test_n_larger_than_set_returns_everything() {
        let engine = StatisticsEngine::default();
        let profiles = vec![
            profile("a", &[("Math", 70.0)]),
            profile("b", &[("Math", 80.0)]),
        ];

        let top = engine.top_n(&profiles, 5);
        let bottom = engine.bottom_n(&profiles, 5);

        assert_eq!(rolls(&top), vec!["b", "a"]);
        assert_eq!(rolls(&bottom), vec!["a", "b"]);
    }

    #[test]
    fn test_ranking_ties_are_stable() {
        let engine = StatisticsEngine::default();
        let profiles = vec![
            profile("first", &[("Math", 70.0)]),
            profile("second", &[("Math", 70.0)]),
            profile("third", &[("Math", 70.0)]),
        ];

        assert_eq!(rolls(&engine.top_n(&profiles, 3)), vec!["first", "second", "third"]);
        assert_eq!(rolls(&engine.top_n(&profiles, 3)), rolls(&engine.top_n(&profiles, 3)));
    }

    #[test]
    fn test_empty_profile_set() {
        let engine = StatisticsEngine::default();
        assert!(engine.top_n(&[], 3).is_empty());
        assert!(engine.bottom_n(&[], 3).is_empty());
        assert_eq!(engine.class_average(&[]), 0.0);
        assert!(engine.grade_distribution(&[]).is_empty());
        assert!(engine.subject_statistics(&[]).is_empty());
    }

    #[test]
    fn test_class_average_is_average_of_averages() {
        let engine = StatisticsEngine::default();
        let profiles = vec![
            profile("a", &[("Math", 100.0)]),
            profile("b", &[("Math", 40.0), ("Physics", 60.0), ("Chemistry", 50.0)]),
        ];

        // Student averages are 100 and 50; the mean over all four marks would be 62.5.
        assert_eq!(engine.class_average(&profiles), 75.0);
    }

    #[test]
    fn test_grade_distribution_in_scale_order() {
        let engine = StatisticsEngine::default();
        let profiles = vec![
            profile("a", &[("Math", 30.0)]),
            profile("b", &[("Math", 95.0)]),
            profile("c", &[("Math", 91.0)]),
        ];

        assert_eq!(
            engine.grade_distribution(&profiles),
            vec![("A+".to_string(), 2), ("F".to_string(), 1)]
        );
    }

    #[test]
    fn test_subject_statistics() {
        let engine = StatisticsEngine::default();
        let records = vec![
            rec("Physics", 72.0),
            rec("Math", 78.0),
            rec("Math", 88.0),
            rec("Math", 54.0),
        ];
        let stats = engine.subject_statistics(&records);

        assert_eq!(stats.len(), 2);
        let math = &stats[0];
        assert_eq!(math.subject, "Math");
        assert_eq!(math.count, 3);
        assert!((math.mean - 73.333_333).abs() < 1e-4);
        assert_eq!(math.min, 54.0);
        assert_eq!(math.max, 88.0);
        assert!((math.std_dev.unwrap() - 17.473_790).abs() < 1e-4);

        let physics = &stats[1];
        assert_eq!(physics.subject, "Physics");
        assert_eq!(physics.std_dev, None);
    }

    #[test]
    fn test_custom_scale() {
        let mut scale = GradeScale::default();
        scale.bands.truncate(1);
        scale.fallback = "Fail".into();
        let engine = StatisticsEngine::new(scale);

        assert_eq!(engine.grade(&profile("a", &[("Math", 89.0)])), "Fail");
    }
}
