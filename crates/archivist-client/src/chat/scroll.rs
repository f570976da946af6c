use crate::state::{FeedChange, FeedStamp};

/// Distance from the top, in points, at which older messages are requested
pub const LOAD_OLDER_THRESHOLD: f32 = 1.0;

/// A vertically scrolling viewport over the message list
pub trait ScrollContainer {
    /// Total content height
    fn scroll_height(&self) -> f32;
    /// Visible height
    fn client_height(&self) -> f32;
    fn scroll_top(&self) -> f32;
    fn set_scroll_top(&mut self, offset: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    Idle,
    PinnedToBottom,
    /// Offset moved by this many points to keep the first visible message in place
    Restored(f32),
}

#[derive(Debug, Clone, Copy)]
struct PendingPrepend {
    generation: u64,
    height: f32,
    saw_in_flight: bool,
}

/// Keeps the viewport where the reader expects it as the feed changes.
///
/// A fresh channel is pinned to the bottom. Before an older page is
/// requested the current content height is recorded; once the page has been
/// laid out the offset grows by the height the new messages added.
#[derive(Debug, Default)]
pub struct ScrollAnchor {
    seen: FeedStamp,
    pending: Option<PendingPrepend>,
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn should_load_older(&self, container: &impl ScrollContainer) -> bool {
        container.scroll_height() > container.client_height()
            && container.scroll_top() <= LOAD_OLDER_THRESHOLD
    }

    /// Remember the content height before asking for an older page
    pub fn record_before_prepend(&mut self, container: &impl ScrollContainer, generation: u64) {
        self.pending = Some(PendingPrepend {
            generation,
            height: container.scroll_height(),
            saw_in_flight: false,
        });
    }

    /// Apply the scroll effect of the latest feed change. Call once per
    /// layout pass with the feed stamp the content was drawn from.
    pub fn reconcile(
        &mut self,
        container: &mut impl ScrollContainer,
        stamp: FeedStamp,
        older_in_flight: bool,
    ) -> ScrollOutcome {
        if self
            .pending
            .is_some_and(|pending| pending.generation != stamp.generation)
        {
            self.pending = None;
        }

        if stamp == self.seen {
            if let Some(pending) = self.pending.as_mut() {
                if older_in_flight {
                    pending.saw_in_flight = true;
                } else if pending.saw_in_flight {
                    // Fetch finished without changing the list
                    self.pending = None;
                }
            }
            return ScrollOutcome::Idle;
        }
        self.seen = stamp;

        match stamp.change {
            FeedChange::Fresh => {
                self.pending = None;
                let bottom = (container.scroll_height() - container.client_height()).max(0.0);
                container.set_scroll_top(bottom);
                ScrollOutcome::PinnedToBottom
            }
            FeedChange::Prepended => match self.pending.take() {
                Some(pending) => {
                    let delta = container.scroll_height() - pending.height;
                    container.set_scroll_top((container.scroll_top() + delta).max(0.0));
                    ScrollOutcome::Restored(delta)
                }
                None => ScrollOutcome::Idle,
            },
            FeedChange::None => ScrollOutcome::Idle,
        }
    }
}
