//! Membership mask over roster positions

/// Selected participants, stored as one flag per roster position so the
/// selection can never hold a duplicate or a name outside the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<bool>,
}

impl Selection {
    pub fn empty(roster_len: usize) -> Self {
        Self {
            selected: vec![false; roster_len],
        }
    }

    /// Flip membership at `index`, returning the new membership.
    /// Out-of-range indices are ignored and report `false`.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.selected.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                *flag
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|flag| *flag = true);
    }

    pub fn clear(&mut self) {
        self.selected.iter_mut().for_each(|flag| *flag = false);
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.selected.iter().filter(|flag| **flag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Selected positions in roster order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(index, flag)| flag.then_some(index))
    }
}
