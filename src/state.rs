use serde::Serialize;

/// Ratio reported for a video slide while it is active. Video progress is
/// driven by the decoder, not the slide timer, so the bar is shown full.
pub const COMPLETE: f32 = 1.0;

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct PlaybackState {
    pub active_index: usize,
    pub is_paused: bool,
    pub elapsed_ratio: f32,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            active_index: 0,
            is_paused: false,
            elapsed_ratio: 0.0,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum PlayerPhase {
    Playing,      // Image slide on screen, slide timer running
    PlayingVideo, // Video slide on screen, waiting for the decoder
    Paused,       // User hold, key or button
}
