//! Helper functions for queue tests

use queue::{QueueView, QueueWidget, RandomShuffler, Roster, TokioTimer};
use std::collections::HashSet;
use std::time::Duration;

pub const TEST_DELAY: Duration = Duration::from_millis(800);

pub struct TestHelpers;

#[allow(dead_code)]
impl TestHelpers {
    /// Widget on the tokio clock with a seeded shuffler; pair with paused time
    pub fn seeded_widget(roster: Roster, seed: u64) -> QueueWidget<TokioTimer, RandomShuffler> {
        QueueWidget::new(roster, TEST_DELAY, TokioTimer::new(), RandomShuffler::from_seed(seed))
    }

    /// Assert the order is exactly a rearrangement of the selection
    pub fn assert_order_matches_selection(view: &QueueView) {
        let selected: HashSet<&str> = view.selected_names().into_iter().collect();
        let ordered = view.order_names();
        let ordered_set: HashSet<&str> = ordered.iter().copied().collect();

        assert_eq!(ordered.len(), view.selected_count, "order length differs from selection");
        assert_eq!(ordered_set.len(), ordered.len(), "order contains duplicates");
        assert_eq!(ordered_set, selected, "order members differ from selection");
    }

    /// Assert the structural invariants every snapshot must satisfy
    pub fn assert_view_invariants(view: &QueueView) {
        let names: HashSet<&str> = view.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), view.roster_size, "roster contains duplicates");
        assert_eq!(view.selected_names().len(), view.selected_count);
        assert!(view.selected_count <= view.roster_size);
        assert_eq!(view.can_generate, !view.is_generating && view.selected_count > 0);
        assert_eq!(view.next.as_deref(), view.order.first().map(|entry| entry.name.as_str()));
        if view.has_order() {
            Self::assert_order_matches_selection(view);
        }
    }
}
