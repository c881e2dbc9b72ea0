/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`RendererCommand`](crate::engine::RendererCommand)
/// values.
///
/// # Example
///
/// ```ignore
/// let target = renderer
///     .track_handle_at(cursor)
///     .map_or(PointerTarget::Background, PointerTarget::TrackHandle);
/// if let Some(cmd) = processor.handle_event(InputEvent::CursorMoved { x, y }, &target) {
///     renderer.execute(cmd, now)?;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in pixels.
        x: f64,
        /// Vertical position in pixels.
        y: f64,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount.
        delta: f64,
    },
    /// A touch pinch gesture started.
    GestureStarted,
    /// A touch pinch gesture ended.
    GestureEnded,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}
