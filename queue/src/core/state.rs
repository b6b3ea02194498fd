//! Selection and generation state machine
//!
//! Pure, synchronous and clock-free. The async delay lives in the widget;
//! this type only knows that a generation was started (a ticket was issued)
//! and later completed or abandoned.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::roster::Roster;
use crate::core::selection::Selection;
use crate::core::view::{OrderEntry, ParticipantView, QueueStatus, QueueView};
use crate::error::{QueueError, QueueResult};

pub type GenerationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating(GenerationId),
}

/// Why a generate request was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateRejected {
    EmptySelection,
    AlreadyGenerating,
}

impl fmt::Display for GenerateRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateRejected::EmptySelection => write!(f, "nobody is selected"),
            GenerateRejected::AlreadyGenerating => write!(f, "a generation is already in flight"),
        }
    }
}

/// Proof that a generation was started. Not `Clone`: each one completes once.
#[derive(Debug, PartialEq, Eq)]
pub struct GenerationTicket {
    id: GenerationId,
}

impl GenerationTicket {
    pub fn id(&self) -> GenerationId {
        self.id
    }
}

/// Result of finishing a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied { len: usize },
    /// Everyone was deselected during the delay
    NothingSelected,
    /// The shuffle returned something other than a rearrangement of the selection
    InvalidPermutation,
    /// The ticket is not the in-flight generation
    Stale,
}

pub struct QueueState {
    roster: Roster,
    selection: Selection,
    order: Vec<String>,
    phase: Phase,
    next_generation: GenerationId,
}

impl QueueState {
    /// Fresh widget: nothing selected, no order, idle
    pub fn new(roster: Roster) -> Self {
        let selection = Selection::empty(roster.len());
        Self {
            roster,
            selection,
            order: Vec::new(),
            phase: Phase::Idle,
            next_generation: 1,
        }
    }

    /// Flip membership of `name`, returning whether it is now selected.
    /// Any existing order is discarded.
    pub fn toggle(&mut self, name: &str) -> QueueResult<bool> {
        let index = self
            .roster
            .position(name)
            .ok_or_else(|| QueueError::unknown(name))?;
        let selected = self.selection.toggle(index);
        self.order.clear();
        Ok(selected)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
        self.order.clear();
    }

    pub fn clear_all(&mut self) {
        self.selection.clear();
        self.order.clear();
    }

    /// Enter the busy phase if there is someone to shuffle and nothing in flight
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, GenerateRejected> {
        if let Phase::Generating(_) = self.phase {
            return Err(GenerateRejected::AlreadyGenerating);
        }
        if self.selection.is_empty() {
            return Err(GenerateRejected::EmptySelection);
        }

        let id = self.next_generation;
        self.next_generation += 1;
        self.phase = Phase::Generating(id);
        Ok(GenerationTicket { id })
    }

    /// Shuffle the selection as it stands now and publish it as the order.
    /// The phase returns to idle unless the ticket is stale.
    pub fn complete_generation<F>(&mut self, ticket: GenerationTicket, shuffle: F) -> Completion
    where
        F: FnOnce(Vec<String>) -> Vec<String>,
    {
        if self.phase != Phase::Generating(ticket.id) {
            return Completion::Stale;
        }
        self.phase = Phase::Idle;

        let selected = self.selected_names();
        if selected.is_empty() {
            self.order.clear();
            return Completion::NothingSelected;
        }

        let shuffled = shuffle(selected.clone());
        if !is_rearrangement(&selected, &shuffled) {
            return Completion::InvalidPermutation;
        }

        let len = shuffled.len();
        self.order = shuffled;
        Completion::Applied { len }
    }

    /// Leave the busy phase without touching the order
    pub fn abandon_generation(&mut self, ticket: GenerationTicket) -> bool {
        if self.phase == Phase::Generating(ticket.id) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating(_))
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.roster
            .position(name)
            .map(|index| self.selection.is_selected(index))
            .unwrap_or(false)
    }

    /// Selected names in roster order
    pub fn selected_names(&self) -> Vec<String> {
        self.selection
            .indices()
            .filter_map(|index| self.roster.get(index))
            .map(str::to_string)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    pub fn can_generate(&self) -> bool {
        !self.is_generating() && !self.selection.is_empty()
    }

    pub fn status(&self) -> QueueStatus {
        if self.is_generating() {
            QueueStatus::Generating
        } else if self.order.is_empty() {
            QueueStatus::IdleEmpty
        } else {
            QueueStatus::IdleWithOrder
        }
    }

    pub fn view(&self) -> QueueView {
        let participants = self
            .roster
            .names()
            .iter()
            .enumerate()
            .map(|(index, name)| ParticipantView {
                name: name.clone(),
                selected: self.selection.is_selected(index),
            })
            .collect();

        let order = self
            .order
            .iter()
            .enumerate()
            .map(|(index, name)| OrderEntry {
                position: index + 1,
                name: name.clone(),
                is_next: index == 0,
            })
            .collect();

        QueueView {
            participants,
            selected_count: self.selection.count(),
            roster_size: self.roster.len(),
            can_generate: self.can_generate(),
            is_generating: self.is_generating(),
            status: self.status(),
            order,
            next: self.order.first().cloned(),
        }
    }
}

fn is_rearrangement(expected: &[String], candidate: &[String]) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }
    let expected: HashSet<&String> = expected.iter().collect();
    let candidate_set: HashSet<&String> = candidate.iter().collect();
    candidate_set.len() == candidate.len() && expected == candidate_set
}
