//! Test fixtures for queue tests

use queue::Roster;
use std::collections::HashSet;

pub struct TestFixtures;

#[allow(dead_code)]
impl TestFixtures {
    /// The three-person roster used by the walkthrough scenarios
    pub fn abc_roster() -> Roster {
        Roster::new(["A", "B", "C"]).unwrap()
    }

    /// The production default roster
    pub fn default_roster() -> Roster {
        Roster::new(shared::DEFAULT_ROSTER).unwrap()
    }

    pub fn name_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
        names.iter().map(|name| name.as_ref().to_string()).collect()
    }
}
