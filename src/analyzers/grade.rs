use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// A single grade band: averages at or above `min` earn `letter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min: f64,
    pub letter: String,
}

/// Maps an average mark (0–100) onto a letter grade.
///
/// Bands are evaluated highest-first; anything below the last band gets
/// `fallback`.
///
/// | Range  | Grade |
/// |--------|-------|
/// | >= 90  | A+    |
/// | >= 80  | A     |
/// | >= 70  | B     |
/// | >= 60  | C     |
/// | >= 50  | D     |
/// | < 50   | F     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub bands: Vec<GradeBand>,
    pub fallback: String,
}

impl Default for GradeScale {
    fn default() -> Self {
        let band = |min: f64, letter: &str| GradeBand {
            min,
            letter: letter.into(),
        };
        GradeScale {
            bands: vec![
                band(90.0, "A+"),
                band(80.0, "A"),
                band(70.0, "B"),
                band(60.0, "C"),
                band(50.0, "D"),
            ],
            fallback: "F".into(),
        }
    }
}

impl GradeScale {
    pub fn grade(&self, average: f64) -> &str {
        self.bands
            .iter()
            .find(|b| average >= b.min)
            .map(|b| b.letter.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// All letters in scale order, best first.
    pub fn letters(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|b| b.letter.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
    }

    /// Counts how many of `grades` fall on each letter, best letter first.
    /// Letters with no students are left out, as are grades not on the scale.
    pub fn distribution<'a, I>(&self, grades: I) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let grades: Vec<&str> = grades.into_iter().collect();
        self.letters()
            .map(|letter| {
                let count = grades.iter().filter(|g| **g == letter).count();
                (letter.to_string(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Checks that lower bounds lie in `[0, 100]` and strictly descend, and
    /// that no letter (the fallback included) appears twice.
    pub fn validate(&self) -> Result<()> {
        for band in &self.bands {
            if !(0.0..=100.0).contains(&band.min) {
                return Err(AnalyzerError::Config(format!(
                    "grade band {} has lower bound {} outside 0-100",
                    band.letter, band.min
                )));
            }
        }
        if self.bands.windows(2).any(|w| w[0].min <= w[1].min) {
            return Err(AnalyzerError::Config(
                "grade bands must be listed with strictly descending lower bounds".into(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.letters().find(|letter| !seen.insert(*letter)) {
            return Err(AnalyzerError::Config(format!(
                "grade letter {dup} is used more than once"
            )));
        }
        Ok(())
    }
}
