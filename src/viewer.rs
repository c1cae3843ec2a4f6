use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use raylib::prelude::*;
use save_the_date::constants::*;
use save_the_date::countdown::Countdown;
use save_the_date::render::{BarStyle, RenderState};
use save_the_date::{
    InputEvent, InteractionHandler, Key, PlaybackConfig, PlaybackController, PlaybackEvent, PlaybackState, Playlist,
};
use tracing::{info, warn};

use crate::media_loader::{load_texture_with_exif_rotation, resolve_source};
use crate::video::VideoStream;

const HEADER_HEIGHT: f32 = 90.0;
const FOOTER_HEIGHT: f32 = 80.0;
const MARGIN: f32 = 20.0;
const BAR_HEIGHT: f32 = 6.0;
const BAR_GAP: f32 = 4.0;
const STORY_ASPECT: f32 = 19.5 / 9.0; // height / width

/// Screen-space rectangles for one frame, recomputed as the window resizes.
struct Layout {
    bars: Rectangle,
    surface: Rectangle,
    button: Rectangle,
}

impl Layout {
    fn compute(screen_width: i32, screen_height: i32) -> Layout {
        let sw = screen_width as f32;
        let sh = screen_height as f32;

        let max_height = (sh - HEADER_HEIGHT - FOOTER_HEIGHT - MARGIN * 2.0).max(100.0);
        let max_width = (sw - MARGIN * 2.0).max(50.0);
        let mut height = max_height;
        let mut width = height / STORY_ASPECT;
        if width > max_width {
            width = max_width;
            height = width * STORY_ASPECT;
        }

        let x = (sw - width) * 0.5;
        let y = HEADER_HEIGHT + MARGIN;
        Layout {
            bars: Rectangle::new(x, HEADER_HEIGHT, width, BAR_HEIGHT),
            surface: Rectangle::new(x, y, width, height),
            button: Rectangle::new(sw * 0.5 - 70.0, y + height + 20.0, 140.0, 40.0),
        }
    }
}

struct Viewer {
    controller: PlaybackController,
    handler: InteractionHandler,
    media_dir: PathBuf,

    textures: Vec<Option<Texture2D>>, // one per slide, None for videos and broken images
    video_texture: Texture2D,
    video: Option<VideoStream>,
    slide_changed: Rc<Cell<bool>>,

    hovering: bool,
    holding: bool,

    couple: String,
    wedding: DateTime<FixedOffset>,
}

pub fn run(
    couple: &str,
    wedding: DateTime<FixedOffset>,
    playlist: Playlist,
    media_dir: &Path,
    config: PlaybackConfig,
) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title(couple)
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load Slides ---
    let mut textures = Vec::with_capacity(playlist.len());
    for slide in playlist.iter() {
        if slide.is_video() {
            textures.push(None);
            continue;
        }
        let path = resolve_source(media_dir, &slide.source);
        match load_texture_with_exif_rotation(&mut rl, &thread, &path) {
            Ok(texture) => textures.push(Some(texture)),
            Err(e) => {
                // Stays in the sequence: enter_slide reports a media error and the slide is skipped after the recovery delay
                warn!(error = %e, "image unavailable");
                textures.push(None);
            }
        }
    }
    let loaded = textures.iter().filter(|t| t.is_some()).count();
    info!(slides = playlist.len(), images = loaded, media_dir = %media_dir.display(), "carousel ready");

    let blank = Image::gen_image_color(VIDEO_WIDTH, VIDEO_HEIGHT, Color::BLACK);
    let video_texture = rl
        .load_texture_from_image(&thread, &blank)
        .map_err(|e| anyhow::anyhow!("Failed to create video texture: {}", e))?;

    let mut controller = PlaybackController::new(playlist, config);
    let slide_changed = Rc::new(Cell::new(true)); // set up the first slide too
    let flag = slide_changed.clone();
    controller.subscribe(move |event: &PlaybackEvent, _: &PlaybackState| {
        if matches!(event, PlaybackEvent::SlideChanged { .. }) {
            flag.set(true);
        }
    });
    controller.start();

    let mut viewer = Viewer {
        controller,
        handler: InteractionHandler::default(),
        media_dir: media_dir.to_path_buf(),
        textures,
        video_texture,
        video: None,
        slide_changed,
        hovering: false,
        holding: false,
        couple: couple.to_string(),
        wedding,
    };

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = Duration::from_secs_f32(rl.get_frame_time());
        let layout = Layout::compute(rl.get_screen_width(), rl.get_screen_height());

        viewer.process_input(&mut rl, &layout);
        viewer.controller.tick(dt);
        viewer.enter_slide();
        viewer.pump_video();

        let frame = RenderState::capture(&viewer.controller);
        let mut d = rl.begin_drawing(&thread);
        viewer.draw(&mut d, &layout, &frame);
    }

    viewer.controller.stop();
    info!("viewer closed");
    Ok(())
}

impl Viewer {
    fn process_input(&mut self, rl: &mut RaylibHandle, layout: &Layout) {
        let mouse = rl.get_mouse_position();
        let over = layout.surface.check_collision_point_rec(mouse);
        let mut events = Vec::new();

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            if layout.button.check_collision_point_rec(mouse) {
                events.push(InputEvent::PauseButton);
            } else if over {
                self.holding = true;
                events.push(InputEvent::PointerDown);
            }
        }
        if self.holding && rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            self.holding = false;
            events.push(InputEvent::PointerUp);
            if over {
                events.push(InputEvent::Tap {
                    x: mouse.x - layout.surface.x,
                    width: layout.surface.width,
                });
            }
        }
        if self.hovering && !over {
            self.holding = false;
            events.push(InputEvent::PointerLeave);
        }
        self.hovering = over;

        let focused = rl.is_window_focused();
        while let Some(c) = rl.get_char_pressed() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            events.push(InputEvent::Key { key, focused });
        }

        for event in events {
            self.handler.handle(&mut self.controller, event);
        }
    }

    /// Swaps media over after the active slide changed.
    fn enter_slide(&mut self) {
        if !self.slide_changed.replace(false) {
            return;
        }
        self.video = None; // stops the previous decoder

        let index = self.controller.state().active_index;
        let slide = self.controller.active_slide();
        if slide.is_video() {
            let path = resolve_source(&self.media_dir, &slide.source);
            match VideoStream::open(&path, VIDEO_WIDTH, VIDEO_HEIGHT, FPS) {
                Ok(stream) => self.video = Some(stream),
                Err(e) => {
                    warn!(error = %e, "video unavailable");
                    self.handler.handle(&mut self.controller, InputEvent::MediaError);
                }
            }
        } else if self.textures[index].is_none() {
            self.handler.handle(&mut self.controller, InputEvent::MediaError);
        }
    }

    /// Pulls one decoded frame per rendered frame; frozen while paused.
    fn pump_video(&mut self) {
        if self.controller.state().is_paused {
            return;
        }
        let Some(stream) = self.video.as_mut() else {
            return;
        };

        let outcome = match stream.next_frame() {
            // Frames are decoded at the texture's size
            Ok(Some(frame)) => match upload_outcome(self.video_texture.update_texture(frame)) {
                Some(event) => event,
                None => return,
            },
            Ok(None) => InputEvent::MediaEnded,
            Err(e) => {
                warn!(error = %e, "video playback failed");
                InputEvent::MediaError
            }
        };
        self.video = None;
        self.handler.handle(&mut self.controller, outcome);
    }

    fn draw(&self, d: &mut RaylibDrawHandle, layout: &Layout, frame: &RenderState) {
        d.clear_background(Color::new(248, 246, 242, 255));

        // Header: names and countdown
        let left = layout.surface.x as i32;
        d.draw_text(&self.couple, left, 20, 32, Color::DARKGRAY);
        let countdown = match Countdown::until(&self.wedding, &Utc::now()) {
            Some(countdown) => format!("{} days to go", countdown.days),
            None => "It's the big day!".to_string(),
        };
        d.draw_text(&countdown, left, 58, 20, Color::GRAY);

        // Progress bars
        let count = frame.bars.len() as f32;
        let bar_width = ((layout.bars.width - BAR_GAP * (count - 1.0)) / count).max(1.0);
        let pulse = 0.6 + 0.4 * (d.get_time() * 4.0).sin().abs() as f32;
        for (i, bar) in frame.bars.iter().enumerate() {
            let x = layout.bars.x + i as f32 * (bar_width + BAR_GAP);
            d.draw_rectangle_rec(
                Rectangle::new(x, layout.bars.y, bar_width, layout.bars.height),
                Color::new(209, 213, 219, 153),
            );
            let color = match bar.style {
                BarStyle::ActiveVideo => Color::new(37, 99, 235, (255.0 * pulse) as u8),
                _ => Color::new(55, 65, 81, 255),
            };
            d.draw_rectangle_rec(
                Rectangle::new(x, layout.bars.y, bar_width * bar.fill, layout.bars.height),
                color,
            );
        }

        // Active media
        d.draw_rectangle_rec(layout.surface, Color::BLACK);
        let texture = if frame.active_slide.is_video() {
            self.video.as_ref().map(|_| &self.video_texture)
        } else {
            self.textures[frame.active_index].as_ref()
        };
        match texture {
            Some(texture) => draw_cover(d, texture, layout.surface),
            None => d.draw_text(
                "Media unavailable",
                left + 16,
                (layout.surface.y + layout.surface.height * 0.5) as i32,
                20,
                Color::LIGHTGRAY,
            ),
        }
        d.draw_text(
            &frame.active_slide.label,
            left + 12,
            (layout.surface.y + layout.surface.height) as i32 - 30,
            18,
            Color::WHITE,
        );

        // Pause indicator
        if frame.show_pause_indicator() {
            let x = (layout.surface.x + layout.surface.width) as i32 - 96;
            let y = layout.surface.y as i32 + 16;
            d.draw_rectangle(x, y, 80, 28, Color::new(0, 0, 0, 128));
            d.draw_text("Paused", x + 10, y + 5, 18, Color::WHITE);
        }

        // Pause/resume button
        let button_color = if frame.pause_button.pressed {
            Color::new(31, 41, 55, 255)
        } else {
            Color::new(55, 65, 81, 255)
        };
        d.draw_rectangle_rec(layout.button, button_color);
        d.draw_text(
            frame.pause_button.caption,
            layout.button.x as i32 + 36,
            layout.button.y as i32 + 10,
            20,
            Color::WHITE,
        );
    }
}

/// A frame that cannot reach the GPU fails the video like a decoder error.
fn upload_outcome<E: std::fmt::Display>(result: Result<(), E>) -> Option<InputEvent> {
    match result {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "video frame upload failed");
            Some(InputEvent::MediaError)
        }
    }
}

/// Fills `dest` with the texture, cropping whatever overflows.
fn draw_cover(d: &mut RaylibDrawHandle, texture: &Texture2D, dest: Rectangle) {
    let tex_width = texture.width() as f32;
    let tex_height = texture.height() as f32;
    let scale = (dest.width / tex_width).max(dest.height / tex_height);
    let src_width = dest.width / scale;
    let src_height = dest.height / scale;

    d.draw_texture_pro(
        texture,
        Rectangle::new((tex_width - src_width) * 0.5, (tex_height - src_height) * 0.5, src_width, src_height),
        dest,
        Vector2::new(0.0, 0.0),
        0.0,
        Color::WHITE,
    );
}
