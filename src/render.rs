use serde::Serialize;

use crate::controller::PlaybackController;
use crate::slide::Slide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarStyle {
    Completed,
    Active,
    ActiveVideo,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressBar {
    pub fill: f32,
    pub style: BarStyle,
}

impl ProgressBar {
    /// Fill as an accessible 0..=100 progress value.
    pub fn percent(&self) -> u8 {
        (self.fill.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PauseButton {
    pub pressed: bool,
    pub label: &'static str,
    pub caption: &'static str,
}

impl PauseButton {
    pub fn new(paused: bool) -> Self {
        if paused {
            Self {
                pressed: true,
                label: "Resume carousel",
                caption: "Resume",
            }
        } else {
            Self {
                pressed: false,
                label: "Pause carousel",
                caption: "Pause",
            }
        }
    }
}

/// Everything a frame needs to draw the carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub active_index: usize,
    pub is_paused: bool,
    pub bars: Vec<ProgressBar>,
    pub active_slide: Slide,
    pub pause_button: PauseButton,
}

impl RenderState {
    pub fn capture(controller: &PlaybackController) -> Self {
        let state = controller.state();
        let bars = controller
            .playlist()
            .iter()
            .enumerate()
            .map(|(i, slide)| {
                if i < state.active_index {
                    ProgressBar { fill: 1.0, style: BarStyle::Completed }
                } else if i == state.active_index && slide.is_video() {
                    ProgressBar { fill: 1.0, style: BarStyle::ActiveVideo }
                } else if i == state.active_index {
                    ProgressBar { fill: state.elapsed_ratio, style: BarStyle::Active }
                } else {
                    ProgressBar { fill: 0.0, style: BarStyle::Upcoming }
                }
            })
            .collect();

        Self {
            active_index: state.active_index,
            is_paused: state.is_paused,
            bars,
            active_slide: controller.active_slide().clone(),
            pause_button: PauseButton::new(state.is_paused),
        }
    }

    pub fn show_pause_indicator(&self) -> bool {
        self.is_paused
    }
}
