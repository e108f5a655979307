//! Playback clock boundary and the per-tick synchronization step.

use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::debug;

use crate::{
    scroll::{Clock, ScrollArbiter},
    session::SessionState,
};

pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// The embedded player, as seen from the engine.
pub trait PlaybackControl {
    fn current_time(&self) -> f64;
    fn seek_to(&mut self, seconds: f64);
}

/// Tick timer for the playback loop. A tick that runs long swallows the
/// missed ones instead of bursting, so ticks never overlap.
pub fn playback_interval() -> Interval {
    let mut ticks = interval(TICK_INTERVAL);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickUpdate {
    pub active_entry: Option<usize>,
    pub active_chapter: Option<usize>,
    pub entry_changed: bool,
    pub chapter_changed: bool,
    /// Entry the view should scroll to now, if auto-scroll is permitted.
    pub scroll_to: Option<usize>,
}

/// Tracks what was active on the previous tick and owns the scroll arbiter.
pub struct PlaybackSync<C: Clock> {
    arbiter: ScrollArbiter<C>,
    last_entry: Option<usize>,
    last_chapter: Option<usize>,
}

impl<C: Clock> PlaybackSync<C> {
    pub fn new(clock: C) -> Self {
        Self {
            arbiter: ScrollArbiter::new(clock),
            last_entry: None,
            last_chapter: None,
        }
    }

    /// One clock tick: record the time, recompute what is active, and ask
    /// the arbiter whether to follow a changed entry.
    pub fn tick(&mut self, session: &mut SessionState, seconds: f64) -> TickUpdate {
        session.set_current_time(seconds);
        let active_entry = session.active_entry_index();
        let active_chapter = session.active_chapter_index();

        let entry_changed = active_entry != self.last_entry;
        let chapter_changed = active_chapter != self.last_chapter;
        self.last_entry = active_entry;
        self.last_chapter = active_chapter;

        let scroll_to = if entry_changed {
            active_entry.filter(|_| self.arbiter.on_active_entry_changed())
        } else {
            None
        };
        if entry_changed {
            debug!(
                ?active_entry,
                ?active_chapter,
                scrolled = scroll_to.is_some(),
                "Active entry changed"
            );
        }

        TickUpdate {
            active_entry,
            active_chapter,
            entry_changed,
            chapter_changed,
            scroll_to,
        }
    }

    /// A scroll event from the transcript view.
    pub fn on_scroll_event(&mut self) {
        self.arbiter.on_scroll_event();
    }

    pub fn arbiter(&mut self) -> &mut ScrollArbiter<C> {
        &mut self.arbiter
    }

    /// Forget the previous tick, e.g. after a new video is loaded.
    pub fn reset(&mut self) {
        self.last_entry = None;
        self.last_chapter = None;
        self.arbiter.reset();
    }
}

/// Seek to a transcript entry the user picked.
pub fn seek_to_entry(
    session: &mut SessionState,
    player: &mut impl PlaybackControl,
    index: usize,
) -> bool {
    let Some(seconds) = session.entries().get(index).map(|e| e.start_seconds) else {
        return false;
    };
    player.seek_to(seconds);
    session.set_current_time(seconds);
    true
}

/// Seek to the start of a chapter the user picked.
pub fn seek_to_chapter(
    session: &mut SessionState,
    player: &mut impl PlaybackControl,
    index: usize,
) -> bool {
    let Some(seconds) = session.chapters().get(index).map(|c| c.start_seconds) else {
        return false;
    };
    player.seek_to(seconds);
    session.set_current_time(seconds);
    true
}

/// Seek to where a note was taken.
pub fn seek_to_note(
    session: &mut SessionState,
    player: &mut impl PlaybackControl,
    index: usize,
) -> bool {
    let Some(seconds) = session.notebook().get(index).map(|n| n.time_seconds) else {
        return false;
    };
    player.seek_to(seconds);
    session.set_current_time(seconds);
    true
}
