//! Converts raw platform events into renderer commands.
//!
//! The `InputProcessor` owns all transient pointer state (cursor position,
//! what the button went down on, whether hover is paused). It is the only
//! thing between raw window events and
//! [`SequenceRenderer::execute`](crate::engine::SequenceRenderer::execute).

use glam::DVec2;

use super::event::{InputEvent, MouseButton};
use crate::engine::{RendererCommand, RendererEvent};
use crate::registry::TrackId;

/// What lies under the cursor, as reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PointerTarget {
    /// The scene or empty panel space.
    #[default]
    Background,
    /// A track's handle in the navigation panel.
    TrackHandle(TrackId),
}

/// What the primary button went down on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    /// Panning; `last` is the previous cursor position.
    Background { last: DVec2 },
    /// Dragging a navigation row.
    Handle,
}

/// Converts raw window events into [`RendererCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// let target = renderer
///     .track_handle_at(cursor)
///     .map_or(PointerTarget::Background, PointerTarget::TrackHandle);
/// if let Some(cmd) = input_processor.handle_event(event, &target) {
///     renderer.execute(cmd, now)?;
/// }
/// for event in renderer.drain_events() {
///     input_processor.observe(&event);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    cursor: DVec2,
    press: Option<Press>,
    /// Hover commands are suppressed while the scene animates.
    hover_paused: bool,
}

impl InputProcessor {
    /// Processor with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> DVec2 {
        self.cursor
    }

    /// Whether the primary button is held.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether a navigation row is being dragged.
    #[must_use]
    pub fn is_dragging_track(&self) -> bool {
        self.press == Some(Press::Handle)
    }

    /// Whether hover processing is paused.
    #[must_use]
    pub fn hover_paused(&self) -> bool {
        self.hover_paused
    }

    /// Track renderer notifications that affect input handling.
    pub fn observe(&mut self, event: &RendererEvent) {
        match event {
            RendererEvent::AnimationBegan => self.hover_paused = true,
            RendererEvent::AnimationEnded => self.hover_paused = false,
            _ => {}
        }
    }

    /// Drop the held button, e.g. when the pointer leaves the window.
    /// Returns a cancel command if a drag was in progress.
    pub fn release_pointer(&mut self) -> Option<RendererCommand> {
        match self.press.take() {
            Some(Press::Handle) => Some(RendererCommand::CancelDrag),
            _ => None,
        }
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// `target` is what the renderer reports under the cursor.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        target: &PointerTarget,
    ) -> Option<RendererCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(DVec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, target)
            }
            InputEvent::Scroll { delta } => Some(RendererCommand::Zoom {
                delta,
                anchor_x: self.cursor.x,
            }),
            InputEvent::GestureStarted => Some(RendererCommand::BeginGesture),
            InputEvent::GestureEnded => Some(RendererCommand::EndGesture),
        }
    }

    fn handle_cursor_moved(&mut self, position: DVec2) -> Option<RendererCommand> {
        self.cursor = position;
        match &mut self.press {
            Some(Press::Background { last }) => {
                let dx = position.x - last.x;
                *last = position;
                (dx != 0.0).then_some(RendererCommand::Pan { dx })
            }
            Some(Press::Handle) => Some(RendererCommand::DragTo { position }),
            None if self.hover_paused => None,
            None => Some(RendererCommand::Hover { x: position.x }),
        }
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        target: &PointerTarget,
    ) -> Option<RendererCommand> {
        if button != MouseButton::Left {
            return None;
        }
        if !pressed {
            return match self.press.take() {
                Some(Press::Handle) => Some(RendererCommand::EndDrag),
                _ => None,
            };
        }
        match target {
            PointerTarget::TrackHandle(track) => {
                self.press = Some(Press::Handle);
                Some(RendererCommand::BeginDrag {
                    track: track.clone(),
                    position: self.cursor,
                })
            }
            PointerTarget::Background => {
                self.press = Some(Press::Background { last: self.cursor });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(p: &mut InputProcessor, x: f64, y: f64) -> Option<RendererCommand> {
        p.handle_event(InputEvent::CursorMoved { x, y }, &PointerTarget::Background)
    }

    fn left(p: &mut InputProcessor, pressed: bool, target: &PointerTarget) -> Option<RendererCommand> {
        p.handle_event(
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            },
            target,
        )
    }

    #[test]
    fn test_background_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = moved(&mut p, 100.0, 10.0);
        assert_eq!(left(&mut p, true, &PointerTarget::Background), None);
        assert_eq!(moved(&mut p, 90.0, 12.0), Some(RendererCommand::Pan { dx: -10.0 }));
        assert_eq!(moved(&mut p, 90.0, 20.0), None);
        assert_eq!(left(&mut p, false, &PointerTarget::Background), None);
        assert!(!p.mouse_pressed());
    }

    #[test]
    fn test_handle_press_drives_drag() {
        let mut p = InputProcessor::new();
        let _ = moved(&mut p, 5.0, 22.0);
        let handle = PointerTarget::TrackHandle("a".into());
        assert_eq!(
            left(&mut p, true, &handle),
            Some(RendererCommand::BeginDrag {
                track: "a".into(),
                position: DVec2::new(5.0, 22.0),
            })
        );
        assert_eq!(
            moved(&mut p, 5.0, 40.0),
            Some(RendererCommand::DragTo {
                position: DVec2::new(5.0, 40.0)
            })
        );
        assert_eq!(left(&mut p, false, &handle), Some(RendererCommand::EndDrag));
    }

    #[test]
    fn test_scroll_zooms_at_cursor() {
        let mut p = InputProcessor::new();
        let _ = moved(&mut p, 42.0, 0.0);
        let cmd = p.handle_event(InputEvent::Scroll { delta: -1.0 }, &PointerTarget::Background);
        assert_eq!(
            cmd,
            Some(RendererCommand::Zoom {
                delta: -1.0,
                anchor_x: 42.0
            })
        );
    }

    #[test]
    fn test_hover_pauses_during_animation() {
        let mut p = InputProcessor::new();
        assert_eq!(moved(&mut p, 3.0, 0.0), Some(RendererCommand::Hover { x: 3.0 }));
        p.observe(&RendererEvent::AnimationBegan);
        assert_eq!(moved(&mut p, 4.0, 0.0), None);
        p.observe(&RendererEvent::AnimationEnded);
        assert_eq!(moved(&mut p, 5.0, 0.0), Some(RendererCommand::Hover { x: 5.0 }));
    }

    #[test]
    fn test_release_pointer_cancels_drag() {
        let mut p = InputProcessor::new();
        let _ = left(&mut p, true, &PointerTarget::TrackHandle("a".into()));
        assert_eq!(p.release_pointer(), Some(RendererCommand::CancelDrag));
        assert_eq!(p.release_pointer(), None);
    }
}
