use std::time::Duration;

pub const SLIDE_DURATION: Duration = Duration::from_millis(3000);         // How long an image slide stays up
pub const ERROR_RECOVERY_DELAY: Duration = Duration::from_millis(2000);   // Wait before skipping a broken slide

pub const RENDER_WIDTH: i32 = 1080;           // Viewer window width
pub const RENDER_HEIGHT: i32 = 1920;          // Viewer window height
pub const FPS: u32 = 60;                      // Frames per second

pub const VIDEO_WIDTH: i32 = 540;             // Decoded video frame width
pub const VIDEO_HEIGHT: i32 = 1170;           // Decoded video frame height (9:19.5)

pub const MIN_PARTY_SIZE: u8 = 1;
pub const MAX_PARTY_SIZE: u8 = 6;

pub const RSVP_COLLECTION: &str = "rsvp";
pub const DOCUMENT_ID_LEN: usize = 20;
