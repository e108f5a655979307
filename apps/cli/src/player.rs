use std::time::Instant;

use videotutor_core::PlaybackControl;

/// Stand-in for an embedded player: a position that advances in real time
/// while playing.
pub struct SimulatedPlayer {
    offset_seconds: f64,
    playing_since: Option<Instant>,
}

impl SimulatedPlayer {
    pub fn new(start_seconds: f64) -> Self {
        Self {
            offset_seconds: start_seconds.max(0.0),
            playing_since: Some(Instant::now()),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    pub fn pause(&mut self) {
        self.offset_seconds = self.current_time();
        self.playing_since = None;
    }

    pub fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
    }
}

impl PlaybackControl for SimulatedPlayer {
    fn current_time(&self) -> f64 {
        let elapsed = self
            .playing_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.offset_seconds + elapsed
    }

    fn seek_to(&mut self, seconds: f64) {
        self.offset_seconds = seconds.max(0.0);
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }
}
