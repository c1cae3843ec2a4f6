use tracing::trace;

use crate::controller::PlaybackController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Char(char),
    Other,
}

/// Raw stimuli coming from whatever draws the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Click or tap at horizontal offset `x` on a surface `width` wide.
    Tap { x: f32, width: f32 },
    PointerDown,
    PointerUp,
    PointerLeave,
    TouchStart,
    TouchEnd,
    Key { key: Key, focused: bool },
    /// The external pause/resume button.
    PauseButton,
    MediaEnded,
    MediaError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Handled,
    /// Handled, and the input's default action (scrolling on space) must not run.
    PreventDefault,
}

/// Maps [`InputEvent`]s onto playback commands.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    pause_keys: Vec<Key>,
}

impl InteractionHandler {
    pub fn new(pause_keys: Vec<Key>) -> Self {
        Self { pause_keys }
    }

    pub fn is_pause_key(&self, key: Key) -> bool {
        self.pause_keys.contains(&key)
    }

    pub fn handle(&self, controller: &mut PlaybackController, event: InputEvent) -> Response {
        trace!(?event, "input");
        match event {
            InputEvent::Tap { x, width } => {
                if !(width > 0.0) || x < 0.0 || x > width {
                    return Response::Ignored;
                }
                if x < width / 2.0 {
                    controller.previous();
                } else {
                    controller.next();
                }
                Response::Handled
            }
            InputEvent::PointerDown | InputEvent::TouchStart => {
                controller.pause();
                Response::Handled
            }
            InputEvent::PointerUp | InputEvent::TouchEnd | InputEvent::PointerLeave => {
                controller.resume();
                Response::Handled
            }
            InputEvent::Key { key, focused } => {
                if !focused || !self.is_pause_key(key) {
                    return Response::Ignored;
                }
                controller.toggle_pause();
                Response::PreventDefault
            }
            InputEvent::PauseButton => {
                controller.toggle_pause();
                Response::Handled
            }
            InputEvent::MediaEnded => {
                controller.on_media_ended();
                Response::Handled
            }
            InputEvent::MediaError => {
                controller.on_media_error();
                Response::Handled
            }
        }
    }
}

impl Default for InteractionHandler {
    fn default() -> Self {
        Self::new(vec![Key::Space, Key::Char('p'), Key::Char('P')])
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::PlaybackConfig;
    use crate::slide::Playlist;

    fn setup() -> (InteractionHandler, PlaybackController) {
        let playlist = Playlist::from_sources(["a.jpg", "b.mp4", "c.jpg"]).unwrap();
        let mut controller = PlaybackController::new(playlist, PlaybackConfig::default());
        controller.start();
        (InteractionHandler::default(), controller)
    }

    fn tap(x: f32) -> InputEvent {
        InputEvent::Tap { x, width: 400.0 }
    }

    #[test]
    fn tap_halves_navigate() {
        let (handler, mut c) = setup();
        assert_eq!(handler.handle(&mut c, tap(300.0)), Response::Handled);
        assert_eq!(c.state().active_index, 1);
        assert_eq!(handler.handle(&mut c, tap(200.0)), Response::Handled);
        assert_eq!(c.state().active_index, 2);
        handler.handle(&mut c, tap(10.0));
        handler.handle(&mut c, tap(199.0));
        assert_eq!(c.state().active_index, 0);
    }

    #[test]
    fn taps_outside_the_surface_are_ignored() {
        let (handler, mut c) = setup();
        assert_eq!(handler.handle(&mut c, tap(-1.0)), Response::Ignored);
        assert_eq!(handler.handle(&mut c, tap(401.0)), Response::Ignored);
        assert_eq!(handler.handle(&mut c, InputEvent::Tap { x: 0.0, width: 0.0 }), Response::Ignored);
        assert_eq!(c.state().active_index, 0);
    }

    #[test]
    fn hold_pauses_until_release() {
        let (handler, mut c) = setup();
        for (press, release) in [
            (InputEvent::PointerDown, InputEvent::PointerUp),
            (InputEvent::TouchStart, InputEvent::TouchEnd),
            (InputEvent::PointerDown, InputEvent::PointerLeave),
        ] {
            handler.handle(&mut c, press);
            assert!(c.state().is_paused);
            assert_eq!(c.tick(Duration::from_secs(10)), None);
            handler.handle(&mut c, release);
            assert!(!c.state().is_paused);
        }
    }

    #[test]
    fn pause_keys_toggle_only_with_focus() {
        let (handler, mut c) = setup();
        let space = |focused| InputEvent::Key { key: Key::Space, focused };

        assert_eq!(handler.handle(&mut c, space(false)), Response::Ignored);
        assert!(!c.state().is_paused);

        assert_eq!(handler.handle(&mut c, space(true)), Response::PreventDefault);
        assert!(c.state().is_paused);
        let p = InputEvent::Key { key: Key::Char('P'), focused: true };
        assert_eq!(handler.handle(&mut c, p), Response::PreventDefault);
        assert!(!c.state().is_paused);

        let other = InputEvent::Key { key: Key::Char('x'), focused: true };
        assert_eq!(handler.handle(&mut c, other), Response::Ignored);
        assert!(!c.state().is_paused);
    }

    #[test]
    fn pause_button_shares_the_pause_flag() {
        let (handler, mut c) = setup();
        handler.handle(&mut c, InputEvent::PauseButton);
        assert!(c.state().is_paused);
        handler.handle(&mut c, InputEvent::PointerUp);
        assert!(!c.state().is_paused);
    }

    #[test]
    fn media_signals_reach_the_controller() {
        let (handler, mut c) = setup();
        c.go_to(1);
        handler.handle(&mut c, InputEvent::MediaError);
        assert!(c.has_pending_recovery());
        handler.handle(&mut c, InputEvent::MediaEnded);
        assert_eq!(c.state().active_index, 2);
        assert!(!c.has_pending_recovery());
    }
}
