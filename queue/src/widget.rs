//! A mounted queue widget
//!
//! Wraps the pure [`QueueState`] with the pacing delay, the shuffle source and
//! a `watch` channel that always holds the latest [`QueueView`]. Front ends
//! call the action methods and render whatever the channel yields.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex};

use shared::{process_debug, process_error, process_info, process_warn, ProcessId, QueueConfig};

use crate::core::{Completion, GenerateRejected, GenerationId, GenerationTicket, QueueState, QueueView, Roster};
use crate::error::{QueueError, QueueResult};
use crate::services::{RandomShuffler, TokioTimer};
use crate::traits::{Shuffler, Timer};

/// What a generate request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateOutcome {
    Started { generation: GenerationId },
    Ignored { reason: IgnoredReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    EmptySelection,
    AlreadyGenerating,
    Unmounted,
}

impl From<GenerateRejected> for IgnoredReason {
    fn from(rejected: GenerateRejected) -> Self {
        match rejected {
            GenerateRejected::EmptySelection => IgnoredReason::EmptySelection,
            GenerateRejected::AlreadyGenerating => IgnoredReason::AlreadyGenerating,
        }
    }
}

impl GenerateOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, GenerateOutcome::Started { .. })
    }
}

struct Inner<T, S> {
    state: Mutex<QueueState>,
    views: watch::Sender<QueueView>,
    mounted: watch::Sender<bool>,
    timer: Arc<T>,
    shuffler: S,
    delay: Duration,
}

pub struct QueueWidget<T, S>
where
    T: Timer + 'static,
    S: Shuffler + 'static,
{
    inner: Arc<Inner<T, S>>,
}

impl QueueWidget<TokioTimer, RandomShuffler> {
    /// Production wiring: tokio clock and an entropy- or config-seeded shuffler
    pub fn from_config(config: &QueueConfig) -> QueueResult<Self> {
        let roster = Roster::new(&config.roster)?;
        Ok(Self::new(
            roster,
            config.delay(),
            TokioTimer::new(),
            RandomShuffler::from_optional_seed(config.seed),
        ))
    }
}

impl<T, S> QueueWidget<T, S>
where
    T: Timer + 'static,
    S: Shuffler + 'static,
{
    /// Mount a widget over `roster` with nothing selected
    pub fn new(roster: Roster, delay: Duration, timer: T, shuffler: S) -> Self {
        let state = QueueState::new(roster);
        let (views, _) = watch::channel(state.view());
        let (mounted, _) = watch::channel(true);

        process_debug!(
            ProcessId::current(),
            "Mounted queue widget with {} participants, delay {:?}",
            state.roster().len(),
            delay
        );

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                views,
                mounted,
                timer: Arc::new(timer),
                shuffler,
                delay,
            }),
        }
    }

    /// Flip one participant; returns whether they are now selected.
    /// Refused once the widget is unmounted.
    pub async fn toggle(&self, name: &str) -> QueueResult<bool> {
        if !self.is_mounted() {
            return Err(QueueError::Unmounted);
        }
        let mut state = self.inner.state.lock().await;
        let selected = state.toggle(name)?;
        self.inner.publish(&state);

        process_debug!(ProcessId::current(), "Toggled {} -> {}", name, selected);
        Ok(selected)
    }

    /// No-op once the widget is unmounted
    pub async fn select_all(&self) {
        if !self.is_mounted() {
            return;
        }
        let mut state = self.inner.state.lock().await;
        state.select_all();
        self.inner.publish(&state);
    }

    /// No-op once the widget is unmounted
    pub async fn clear_all(&self) {
        if !self.is_mounted() {
            return;
        }
        let mut state = self.inner.state.lock().await;
        state.clear_all();
        self.inner.publish(&state);
    }

    /// Start a generation. The order appears on the view channel once the
    /// delay has elapsed; use [`wait_until_idle`](Self::wait_until_idle) to
    /// block on it.
    pub async fn generate(&self) -> GenerateOutcome {
        if !self.is_mounted() {
            return GenerateOutcome::Ignored {
                reason: IgnoredReason::Unmounted,
            };
        }

        let ticket = {
            let mut state = self.inner.state.lock().await;
            match state.begin_generation() {
                Ok(ticket) => {
                    self.inner.publish(&state);
                    ticket
                }
                Err(rejected) => {
                    process_debug!(ProcessId::current(), "Generate ignored: {}", rejected);
                    return GenerateOutcome::Ignored {
                        reason: rejected.into(),
                    };
                }
            }
        };

        let generation = ticket.id();
        process_info!(ProcessId::current(), "🔀 Generation {} started", generation);

        let timer = Arc::clone(&self.inner.timer);
        let delay = self.inner.delay;
        let mut mounted = self.inner.mounted.subscribe();
        let weak: Weak<Inner<T, S>> = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            let elapsed = tokio::select! {
                _ = timer.sleep(delay) => true,
                _ = mounted.wait_for(|is_mounted| !*is_mounted) => false,
            };

            let Some(inner) = weak.upgrade() else {
                process_debug!(ProcessId::current(), "Generation {} discarded: widget dropped", generation);
                return;
            };
            let still_mounted = elapsed && *inner.mounted.borrow();
            if still_mounted {
                inner.finish(ticket).await;
            } else {
                inner.abandon(ticket).await;
            }
        });

        GenerateOutcome::Started { generation }
    }

    /// Latest snapshot
    pub fn view(&self) -> QueueView {
        self.inner.views.borrow().clone()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<QueueView> {
        self.inner.views.subscribe()
    }

    /// Resolve once no generation is in flight
    pub async fn wait_until_idle(&self) -> QueueView {
        let mut views = self.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel
        let view = match views.wait_for(|view| !view.is_generating).await {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        };
        view
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    pub fn is_mounted(&self) -> bool {
        *self.inner.mounted.borrow()
    }

    /// Tear the widget down. A pending generation is dropped unapplied and
    /// the widget settles back to idle, so `wait_until_idle` still resolves.
    pub fn unmount(&self) {
        if self.inner.mounted.send_replace(false) {
            process_debug!(ProcessId::current(), "Queue widget unmounted");
        }
    }
}

impl<T, S> Drop for QueueWidget<T, S>
where
    T: Timer + 'static,
    S: Shuffler + 'static,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<T, S> Inner<T, S>
where
    T: Timer,
    S: Shuffler,
{
    fn publish(&self, state: &QueueState) {
        self.views.send_replace(state.view());
    }

    /// Leave the busy phase without producing an order
    async fn abandon(&self, ticket: GenerationTicket) {
        let generation = ticket.id();
        let mut state = self.state.lock().await;
        if state.abandon_generation(ticket) {
            process_debug!(ProcessId::current(), "Generation {} discarded: widget unmounted", generation);
        }
        self.publish(&state);
    }

    async fn finish(&self, ticket: GenerationTicket) {
        let generation = ticket.id();
        let mut state = self.state.lock().await;
        let completion = state.complete_generation(ticket, |names| self.shuffler.shuffle(names));

        match completion {
            Completion::Applied { len } => {
                process_info!(
                    ProcessId::current(),
                    "✅ Generation {} applied: {} in line, next up {}",
                    generation,
                    len,
                    state.order().first().map(String::as_str).unwrap_or("-")
                );
            }
            Completion::NothingSelected => {
                process_info!(ProcessId::current(), "Generation {} finished with nobody selected", generation);
            }
            Completion::InvalidPermutation => {
                process_error!(
                    ProcessId::current(),
                    "❌ Generation {} produced an order that does not match the selection",
                    generation
                );
            }
            Completion::Stale => {
                process_warn!(ProcessId::current(), "Generation {} was no longer in flight", generation);
            }
        }

        self.publish(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QueueStatus;
    use crate::traits::{MockShuffler, MockTimer};

    fn roster() -> Roster {
        Roster::new(["A", "B", "C"]).unwrap()
    }

    fn reversing_shuffler() -> MockShuffler {
        let mut shuffler = MockShuffler::new();
        shuffler.expect_shuffle().returning(|mut names| {
            names.reverse();
            names
        });
        shuffler
    }

    fn instant_timer() -> MockTimer {
        let mut timer = MockTimer::new();
        timer.expect_sleep().returning(|_| ());
        timer
    }

    #[tokio::test]
    async fn test_generate_with_mocked_effects() {
        let widget = QueueWidget::new(roster(), Duration::from_millis(800), instant_timer(), reversing_shuffler());
        widget.toggle("A").await.unwrap();
        widget.toggle("C").await.unwrap();

        let outcome = widget.generate().await;
        assert!(outcome.is_started());

        let view = widget.wait_until_idle().await;
        assert_eq!(view.order_names(), vec!["C", "A"]);
        assert_eq!(view.next.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_timer_receives_configured_delay() {
        let mut timer = MockTimer::new();
        timer
            .expect_sleep()
            .withf(|duration| *duration == Duration::from_millis(250))
            .times(1)
            .returning(|_| ());

        let widget = QueueWidget::new(roster(), Duration::from_millis(250), timer, reversing_shuffler());
        widget.select_all().await;
        widget.generate().await;
        widget.wait_until_idle().await;
    }

    #[tokio::test]
    async fn test_empty_selection_never_touches_timer_or_shuffler() {
        let mut timer = MockTimer::new();
        timer.expect_sleep().never();
        let mut shuffler = MockShuffler::new();
        shuffler.expect_shuffle().never();

        let widget = QueueWidget::new(roster(), Duration::ZERO, timer, shuffler);
        let outcome = widget.generate().await;

        assert_eq!(
            outcome,
            GenerateOutcome::Ignored {
                reason: IgnoredReason::EmptySelection
            }
        );
        assert!(!widget.view().is_generating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_pending_completion() {
        let mut shuffler = MockShuffler::new();
        shuffler.expect_shuffle().never();

        let widget = QueueWidget::new(roster(), Duration::from_millis(800), TokioTimer::new(), shuffler);
        widget.select_all().await;

        assert!(widget.generate().await.is_started());
        widget.unmount();

        let view = tokio::time::timeout(Duration::from_millis(100), widget.wait_until_idle())
            .await
            .expect("unmounted widget should settle to idle");
        assert!(!view.is_generating);
        assert_eq!(view.status, QueueStatus::IdleEmpty);
        assert!(view.order.is_empty());
        assert_eq!(
            widget.generate().await,
            GenerateOutcome::Ignored {
                reason: IgnoredReason::Unmounted
            }
        );
    }

    #[tokio::test]
    async fn test_selection_is_frozen_after_unmount() {
        let widget = QueueWidget::new(roster(), Duration::ZERO, instant_timer(), reversing_shuffler());
        widget.toggle("B").await.unwrap();
        widget.unmount();

        assert!(matches!(widget.toggle("A").await, Err(QueueError::Unmounted)));
        widget.select_all().await;
        widget.clear_all().await;

        let view = widget.view();
        assert_eq!(view.selected_names(), vec!["B"]);
    }

    #[test]
    fn test_outcome_serialization() {
        let started = serde_json::to_value(GenerateOutcome::Started { generation: 4 }).unwrap();
        assert_eq!(started, serde_json::json!({ "outcome": "started", "generation": 4 }));

        let ignored = serde_json::to_value(GenerateOutcome::Ignored {
            reason: IgnoredReason::AlreadyGenerating,
        })
        .unwrap();
        assert_eq!(ignored, serde_json::json!({ "outcome": "ignored", "reason": "already_generating" }));
    }
}
