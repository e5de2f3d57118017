use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Props arrive as struct fields. `render` takes `&mut self` so a component
/// can update presentation state while drawing: `ThreadView` clamps its scroll
/// offset, the composer moves its internal scroll to follow the cursor.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that consumes raw terminal events and may report a
/// higher-level one (`ComposerEvent::Submit`, for example).
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
