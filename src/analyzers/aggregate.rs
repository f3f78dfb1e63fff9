use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::analyzers::types::{Marks, StudentProfile};
use crate::analyzers::utility::mean;
use crate::records::CleanRecord;

/// Ordered arena of profiles with a `roll_no → position` index.
#[derive(Debug, Clone, Default)]
pub struct StudentRegistry {
    profiles: Vec<StudentProfile>,
    index: HashMap<String, usize>,
}

impl StudentRegistry {
    /// Adds `profile`, replacing in place any profile with the same roll number.
    fn upsert(&mut self, profile: StudentProfile) {
        match self.index.get(&profile.roll_no) {
            Some(&pos) => {
                warn!(
                    roll_no = %profile.roll_no,
                    replaced = %self.profiles[pos].name,
                    name = %profile.name,
                    "Roll number shared by differently named students, keeping the later one"
                );
                self.profiles[pos] = profile;
            }
            None => {
                self.index.insert(profile.roll_no.clone(), self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    pub fn get(&self, roll_no: &str) -> Option<&StudentProfile> {
        self.index.get(roll_no).map(|&pos| &self.profiles[pos])
    }

    pub fn profiles(&self) -> &[StudentProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Groups clean records into one [`StudentProfile`] per roll number.
#[derive(Debug, Default, Clone, Copy)]
pub struct StudentAggregator;

impl StudentAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Groups `records` by `(roll_no, name)` in ascending key order.
    ///
    /// Gender comes from the first record of each group. A subject seen twice
    /// for the same student keeps the later mark.
    pub fn aggregate(&self, records: &[CleanRecord]) -> StudentRegistry {
        let mut groups: BTreeMap<(&str, &str), Vec<&CleanRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.roll_no.as_str(), record.name.as_str()))
                .or_default()
                .push(record);
        }

        let mut registry = StudentRegistry::default();

        for ((roll_no, name), group) in groups {
            let mut marks = Marks::default();
            for record in &group {
                if let Some(previous) = marks.insert(&record.subject, record.marks) {
                    debug!(
                        roll_no,
                        subject = %record.subject,
                        previous,
                        current = record.marks,
                        "Duplicate subject, overwriting earlier mark"
                    );
                }
            }

            let attendance: Vec<f64> = group.iter().filter_map(|r| r.attendance).collect();

            registry.upsert(StudentProfile {
                roll_no: roll_no.to_string(),
                name: name.to_string(),
                gender: group.first().and_then(|r| r.gender.clone()),
                attendance: (!attendance.is_empty()).then(|| mean(&attendance)),
                marks,
            });
        }

        info!(students = registry.len(), "Built student profiles");
        registry
    }
}
