//! The fixed, ordered list of eligible participants

use std::collections::HashSet;

use crate::error::{QueueError, QueueResult};

/// Ordered, duplicate-free participant names. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Validate and build a roster; names are trimmed
    pub fn new<I, S>(names: I) -> QueueResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut validated = Vec::new();

        for (position, name) in names.into_iter().enumerate() {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(QueueError::BlankParticipant { position });
            }
            if !seen.insert(name.to_string()) {
                return Err(QueueError::DuplicateParticipant { name: name.to_string() });
            }
            validated.push(name.to_string());
        }

        if validated.is_empty() {
            return Err(QueueError::EmptyRoster);
        }

        Ok(Self { names: validated })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed roster
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}
