use crate::blur::BlurRequest;
use crate::gesture::TimerToken;
use crate::geometry::Vector;
use std::time::Duration;

/// Which of the two drawing layers needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The collapsed button in its own slot.
    Widget,
    /// The full-surface capture layer used while expanded.
    Overlay,
}

/// Output of a radial button, drained by the host after each input or tick.
///
/// `CollapseFinished` always follows `OverlayDetached` and precedes the
/// widget-layer `Invalidate`, so content changed in response to it is what
/// gets painted next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    Expand,
    Collapse,
    /// A sub-button was chosen; counts from 1 along the arc.
    PopupButtonClicked(usize),
    CollapseFinished,
    OverlayAttached,
    OverlayDetached,
    /// Snapshot the root surface, blur it off-thread, hand it back.
    BlurRequested(BlurRequest),
    Invalidate(Layer),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveEvent {
    /// Cumulative offset from where the drag started.
    MovingTo(Vector),
    MoveEnded(Vector),
    Clicked,
    LongClicked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    Widget(WidgetEvent),
    Move(MoveEvent),
    /// Call back into the node with `token` after `delay` unless superseded.
    ScheduleLongPress { token: TimerToken, delay: Duration },
}

impl From<WidgetEvent> for NodeEvent {
    fn from(event: WidgetEvent) -> Self {
        NodeEvent::Widget(event)
    }
}

impl From<MoveEvent> for NodeEvent {
    fn from(event: MoveEvent) -> Self {
        NodeEvent::Move(event)
    }
}
