use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{PlaybackConfig, ResumePolicy};
use crate::slide::{Playlist, Slide};
use crate::state::{PlaybackState, PlayerPhase, COMPLETE};
use crate::timer::SlideTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvanceCause {
    Timer,
    Next,
    Previous,
    Jump,
    MediaEnded,
    MediaError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    SlideChanged {
        from: usize,
        to: usize,
        cause: AdvanceCause,
    },
    Progress {
        index: usize,
        ratio: f32,
    },
    Paused,
    Resumed,
    RecoveryScheduled {
        index: usize,
        delay: Duration,
    },
}

/// Receives every state change the controller makes. Closures taking
/// `(&PlaybackEvent, &PlaybackState)` qualify.
pub trait PlaybackObserver {
    fn on_event(&mut self, event: &PlaybackEvent, state: &PlaybackState);
}

impl<F> PlaybackObserver for F
where
    F: FnMut(&PlaybackEvent, &PlaybackState),
{
    fn on_event(&mut self, event: &PlaybackEvent, state: &PlaybackState) {
        self(event, state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// Owns the carousel's playback state and the timers that drive it.
///
/// Image slides advance once the slide timer runs out. Video slides wait for
/// [`on_media_ended`](Self::on_media_ended) or the delayed skip armed by
/// [`on_media_error`](Self::on_media_error). The controller never sees the
/// wall clock: the frame loop feeds it deltas through [`tick`](Self::tick).
pub struct PlaybackController {
    playlist: Playlist,
    config: PlaybackConfig,
    state: PlaybackState,
    running: bool,

    slide_timer: Option<SlideTimer>,
    recovery: Option<SlideTimer>,
    held: Option<Duration>, // slide timer progress at pause

    observers: Vec<(ObserverId, Box<dyn PlaybackObserver>)>,
    next_observer_id: usize,
}

impl PlaybackController {
    pub fn new(playlist: Playlist, config: PlaybackConfig) -> Self {
        let mut controller = Self {
            playlist,
            config,
            state: PlaybackState::new(),
            running: false,
            slide_timer: None,
            recovery: None,
            held: None,
            observers: Vec::new(),
            next_observer_id: 0,
        };
        controller.state.elapsed_ratio = controller.entry_ratio();
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn active_slide(&self) -> &Slide {
        &self.playlist[self.state.active_index]
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_pending_recovery(&self) -> bool {
        self.recovery.is_some()
    }

    pub fn phase(&self) -> PlayerPhase {
        if self.state.is_paused {
            PlayerPhase::Paused
        } else if self.active_slide().is_video() {
            PlayerPhase::PlayingVideo
        } else {
            PlayerPhase::Playing
        }
    }

    pub fn subscribe(&mut self, observer: impl PlaybackObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Begins timing the active slide. Video slides and a paused carousel
    /// stay put until something else moves them.
    pub fn start(&mut self) {
        self.running = true;
        if self.slide_timer.is_none() {
            self.arm(Duration::ZERO);
        }
    }

    /// Tears the controller down: every timer is released and ticks are
    /// ignored until the next [`start`](Self::start).
    pub fn stop(&mut self) {
        self.running = false;
        self.slide_timer = None;
        self.recovery = None;
        self.held = None;
    }

    /// Feeds `dt` of elapsed time to the live timers. Returns the new active
    /// index when this tick moved the carousel. Never advances more than
    /// one slide per call.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        if !self.running || self.state.is_paused {
            return None;
        }

        if let Some(recovery) = self.recovery.as_mut() {
            recovery.update(dt);
            if recovery.is_expired() {
                return Some(self.advance(AdvanceCause::MediaError));
            }
        }

        let timer = self.slide_timer.as_mut()?;
        timer.update(dt);
        let ratio = timer.ratio();
        let expired = timer.is_expired();

        self.state.elapsed_ratio = ratio;
        self.notify(PlaybackEvent::Progress {
            index: self.state.active_index,
            ratio,
        });

        if expired {
            Some(self.advance(AdvanceCause::Timer))
        } else {
            None
        }
    }

    /// Jumps to `index`, wrapped onto the playlist.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.change_slide(index, AdvanceCause::Jump)
    }

    pub fn next(&mut self) -> usize {
        self.change_slide(self.state.active_index + 1, AdvanceCause::Next)
    }

    pub fn previous(&mut self) -> usize {
        let index = if self.state.active_index == 0 {
            self.playlist.len() - 1
        } else {
            self.state.active_index - 1
        };
        self.change_slide(index, AdvanceCause::Previous)
    }

    pub fn pause(&mut self) {
        if self.state.is_paused {
            return;
        }
        self.state.is_paused = true;
        // The bar keeps showing the frozen ratio.
        self.held = self.slide_timer.take().map(|timer| timer.elapsed());
        debug!(index = self.state.active_index, ratio = self.state.elapsed_ratio, "playback paused");
        self.notify(PlaybackEvent::Paused);
    }

    pub fn resume(&mut self) {
        if !self.state.is_paused {
            return;
        }
        self.state.is_paused = false;
        let held = self.held.take();
        let from = match self.config.resume_policy {
            ResumePolicy::Restart => Duration::ZERO,
            ResumePolicy::Continue => held.unwrap_or(Duration::ZERO),
        };
        self.arm(from);
        debug!(index = self.state.active_index, ratio = self.state.elapsed_ratio, "playback resumed");
        self.notify(PlaybackEvent::Resumed);
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// The active video played to its end.
    pub fn on_media_ended(&mut self) -> usize {
        self.advance(AdvanceCause::MediaEnded)
    }

    /// The active slide's media could not be loaded or played. Skips it
    /// after the recovery delay instead of right away.
    pub fn on_media_error(&mut self) {
        let index = self.state.active_index;
        let delay = self.config.error_recovery_delay();
        warn!(index, source = %self.active_slide().source, ?delay, "media failed, skipping after delay");

        if self.recovery.is_some() {
            return;
        }
        self.recovery = Some(SlideTimer::new(delay));
        self.notify(PlaybackEvent::RecoveryScheduled { index, delay });
    }

    fn advance(&mut self, cause: AdvanceCause) -> usize {
        self.change_slide(self.state.active_index + 1, cause)
    }

    fn change_slide(&mut self, index: usize, cause: AdvanceCause) -> usize {
        let from = self.state.active_index;
        let to = self.playlist.wrap(index);

        // Everything armed for the outgoing slide goes with it.
        self.slide_timer = None;
        self.recovery = None;
        self.held = None;

        self.state.active_index = to;
        self.state.elapsed_ratio = self.entry_ratio();
        self.arm(Duration::ZERO);

        debug!(from, to, ?cause, "slide changed");
        self.notify(PlaybackEvent::SlideChanged { from, to, cause });
        to
    }

    /// Arms the slide timer at `elapsed` when the active slide is timed.
    fn arm(&mut self, elapsed: Duration) {
        if !self.running || self.state.is_paused || self.active_slide().is_video() {
            return;
        }
        let timer = SlideTimer::starting_at(elapsed, self.config.slide_duration());
        self.state.elapsed_ratio = timer.ratio();
        self.slide_timer = Some(timer);
    }

    fn entry_ratio(&self) -> f32 {
        if self.active_slide().is_video() {
            COMPLETE
        } else {
            0.0
        }
    }

    fn notify(&mut self, event: PlaybackEvent) {
        let state = self.state;
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(&event, &state);
        }
    }
}
