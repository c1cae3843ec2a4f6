//! Core of a wedding invitation page: the story-style media carousel with
//! its playback timers, plus the RSVP form, deadline gate, countdown,
//! programme and FAQ that sit next to it. Nothing in here draws; the `save-the-date`
//! binary renders it with raylib.

pub mod config;
pub mod constants;
pub mod controller;
pub mod countdown;
pub mod deadline;
pub mod error;
pub mod faq;
pub mod input;
pub mod profile;
pub mod programme;
pub mod render;
pub mod rsvp;
pub mod slide;
pub mod state;
pub mod store;
pub mod timer;

pub use config::{PlaybackConfig, ResumePolicy, SiteConfig};
pub use controller::{AdvanceCause, PlaybackController, PlaybackEvent, PlaybackObserver};
pub use input::{InputEvent, InteractionHandler, Key, Response};
pub use render::RenderState;
pub use slide::{Playlist, Slide, SlideKind};
pub use state::{PlaybackState, PlayerPhase};
