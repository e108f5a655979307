//! Arbitration between transcript auto-scroll and the user's own scrolling.
//!
//! A user scroll suppresses auto-scroll until [`USER_SCROLL_TIMEOUT_MS`] of
//! silence. Scroll events raised by our own smooth-scroll animation arrive
//! while in [`ScrollState::ProgrammaticScroll`] and are not attributed to the
//! user.

use std::cell::Cell;
use std::time::Instant;

use tracing::debug;

pub const USER_SCROLL_TIMEOUT_MS: u64 = 3000;
pub const PROGRAMMATIC_SETTLE_MS: u64 = 800;

const _: () = assert!(PROGRAMMATIC_SETTLE_MS < USER_SCROLL_TIMEOUT_MS);

/// Millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed since the clock was created.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for deterministic tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    UserScrolling { until_ms: u64 },
    ProgrammaticScroll { until_ms: u64 },
}

pub struct ScrollArbiter<C: Clock> {
    clock: C,
    state: ScrollState,
}

impl<C: Clock> ScrollArbiter<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: ScrollState::Idle,
        }
    }

    /// Current state after applying any elapsed deadline.
    pub fn state(&mut self) -> ScrollState {
        self.expire();
        self.state
    }

    pub fn auto_scroll_permitted(&mut self) -> bool {
        self.state() == ScrollState::Idle
    }

    /// A scroll event from the transcript view. Ignored while our own
    /// animation is settling.
    pub fn on_scroll_event(&mut self) -> ScrollState {
        self.expire();
        let now = self.clock.now_ms();
        match self.state {
            ScrollState::ProgrammaticScroll { .. } => {}
            ScrollState::Idle | ScrollState::UserScrolling { .. } => {
                if self.state == ScrollState::Idle {
                    debug!("Auto-scroll suppressed by user scroll");
                }
                self.state = ScrollState::UserScrolling {
                    until_ms: now + USER_SCROLL_TIMEOUT_MS,
                };
            }
        }
        self.state
    }

    /// The active entry changed. Returns true when the caller should scroll
    /// it into view now. Only a user scroll suppresses this; a change while
    /// our own scroll is still settling re-arms the settle deadline.
    pub fn on_active_entry_changed(&mut self) -> bool {
        self.expire();
        if let ScrollState::UserScrolling { .. } = self.state {
            return false;
        }
        self.state = ScrollState::ProgrammaticScroll {
            until_ms: self.clock.now_ms() + PROGRAMMATIC_SETTLE_MS,
        };
        true
    }

    /// Forget any suppression, e.g. when a new video is loaded.
    pub fn reset(&mut self) {
        self.state = ScrollState::Idle;
    }

    fn expire(&mut self) {
        let now = self.clock.now_ms();
        match self.state {
            ScrollState::UserScrolling { until_ms } if now >= until_ms => {
                debug!("User scroll timeout elapsed; auto-scroll resumed");
                self.state = ScrollState::Idle;
            }
            ScrollState::ProgrammaticScroll { until_ms } if now >= until_ms => {
                self.state = ScrollState::Idle;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);
        assert_eq!(arbiter.state(), ScrollState::Idle);
        assert!(arbiter.auto_scroll_permitted());
    }

    #[test]
    fn test_user_scroll_then_silence_returns_to_idle() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        arbiter.on_scroll_event();
        assert!(!arbiter.auto_scroll_permitted());

        clock.set(2999);
        assert!(!arbiter.auto_scroll_permitted());
        clock.set(3001);
        assert_eq!(arbiter.state(), ScrollState::Idle);
    }

    #[test]
    fn test_repeated_user_scroll_restarts_timer() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        arbiter.on_scroll_event();
        clock.set(2000);
        arbiter.on_scroll_event();

        clock.set(3500);
        assert!(!arbiter.auto_scroll_permitted());
        clock.set(4999);
        assert!(!arbiter.auto_scroll_permitted());
        clock.set(5000);
        assert!(arbiter.auto_scroll_permitted());
    }

    #[test]
    fn test_entry_change_scrolls_only_when_idle() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        arbiter.on_scroll_event();
        assert!(!arbiter.on_active_entry_changed());

        clock.set(USER_SCROLL_TIMEOUT_MS);
        assert!(arbiter.on_active_entry_changed());
        assert!(matches!(
            arbiter.state(),
            ScrollState::ProgrammaticScroll { .. }
        ));
    }

    #[test]
    fn test_programmatic_scroll_events_are_not_attributed_to_user() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        assert!(arbiter.on_active_entry_changed());
        clock.advance(100);
        arbiter.on_scroll_event();
        clock.advance(100);
        arbiter.on_scroll_event();
        assert!(matches!(
            arbiter.state(),
            ScrollState::ProgrammaticScroll { .. }
        ));

        clock.set(PROGRAMMATIC_SETTLE_MS);
        assert_eq!(arbiter.state(), ScrollState::Idle);
    }

    #[test]
    fn test_entry_change_while_settling_scrolls_again() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        assert!(arbiter.on_active_entry_changed());
        clock.set(500);
        assert!(arbiter.on_active_entry_changed());
        assert_eq!(
            arbiter.state(),
            ScrollState::ProgrammaticScroll {
                until_ms: 500 + PROGRAMMATIC_SETTLE_MS
            }
        );

        clock.set(PROGRAMMATIC_SETTLE_MS + 100);
        arbiter.on_scroll_event();
        assert!(matches!(
            arbiter.state(),
            ScrollState::ProgrammaticScroll { .. }
        ));
    }

    #[test]
    fn test_user_scroll_after_settle_suppresses() {
        let clock = ManualClock::new();
        let mut arbiter = ScrollArbiter::new(&clock);

        arbiter.on_active_entry_changed();
        clock.set(PROGRAMMATIC_SETTLE_MS + 10);
        arbiter.on_scroll_event();
        assert_eq!(
            arbiter.state(),
            ScrollState::UserScrolling {
                until_ms: PROGRAMMATIC_SETTLE_MS + 10 + USER_SCROLL_TIMEOUT_MS
            }
        );
    }
}
