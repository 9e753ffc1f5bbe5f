//! A board node: a radial button that can also be dragged around and
//! long-pressed, depending on its [`Mode`].

use crate::blur::Backdrop;
use crate::button::ButtonEntity;
use crate::color::{self, Color};
use crate::config::WidgetConfig;
use crate::events::{MoveEvent, NodeEvent};
use crate::geometry::{Point, Rect};
use crate::gesture::{GestureClassifier, GestureOutput, TimerToken};
use crate::input::{PointerEvent, PointerKind};
use crate::widget::RadialButton;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::VecDeque;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};

pub const NODE_ICON: &str = "node";
pub const NEGATIVE_NODE_ICON: &str = "node-negative";
pub const TAKE_ICON: &str = "take";
pub const GIVE_ICON: &str = "give";

/// Decides which gestures a node listens for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    EnumIter,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Mode {
    /// Drag to move; click and long-click are reported.
    #[default]
    Movable,
    /// Press to fan out the take/give buttons. Never moves.
    Expandable,
    /// Neither moves nor expands.
    ClicksOnly,
}

#[derive(Debug)]
pub struct MovableNode {
    widget: RadialButton,
    classifier: GestureClassifier,
    mode: Mode,
    amount: i64,
    drag_origin: Option<Rect>,
    events: VecDeque<NodeEvent>,
}

fn node_buttons(amount: i64, background: Color) -> (ButtonEntity, Vec<ButtonEntity>) {
    let icon = if amount < 0 {
        NEGATIVE_NODE_ICON
    } else {
        NODE_ICON
    };
    let primary = ButtonEntity::icon_and_amount(icon, 0.0, amount).with_background(background);
    let subs = vec![
        ButtonEntity::icon(TAKE_ICON, 0.0),
        ButtonEntity::icon(GIVE_ICON, 0.0),
    ];
    (primary, subs)
}

impl MovableNode {
    pub fn new(config: WidgetConfig) -> Self {
        let (primary, subs) = node_buttons(0, color::WHITE);
        Self {
            widget: RadialButton::new(config, primary, subs),
            classifier: GestureClassifier::default(),
            mode: Mode::default(),
            amount: 0,
            drag_origin: None,
            events: VecDeque::new(),
        }
    }

    pub fn widget(&self) -> &RadialButton {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut RadialButton {
        &mut self.widget
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("node mode {} -> {mode}", self.mode);
            self.cancel_drag();
            self.classifier.reset();
            self.mode = mode;
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: i64) {
        self.amount = amount;
        let (primary, subs) = node_buttons(amount, self.widget.primary().background());
        self.widget.set_buttons(primary, subs);
        self.pull_widget_events();
    }

    pub fn increment_amount(&mut self) {
        self.set_amount(self.amount + 1);
    }

    pub fn decrement_amount(&mut self) {
        self.set_amount(self.amount - 1);
    }

    pub fn set_primary_background(&mut self, background: Color) {
        let (primary, subs) = node_buttons(self.amount, background);
        self.widget.set_buttons(primary, subs);
        self.pull_widget_events();
    }

    pub fn bounds(&self) -> Rect {
        self.widget.bounds()
    }

    pub fn center(&self) -> Point {
        self.widget.bounds().center()
    }

    pub fn set_center(&mut self, center: Point) {
        let size = self.widget.desired_size();
        self.widget.set_bounds(Rect::square_around(center, size));
        self.pull_widget_events();
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = NodeEvent> + '_ {
        self.pull_widget_events();
        self.events.drain(..)
    }

    fn pull_widget_events(&mut self) {
        self.events
            .extend(self.widget.drain_events().map(NodeEvent::from));
    }

    fn cancel_drag(&mut self) {
        if let Some(origin) = self.drag_origin.take() {
            self.widget.set_bounds(origin);
        }
    }

    /// Feeds one pointer sample. Returns whether the node consumed it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let consumed = if self.widget.overlay_attached() {
            self.widget.handle_pointer(event)
        } else {
            match self.mode {
                Mode::Movable => self.handle_movable(event),
                Mode::Expandable => self.widget.handle_pointer(event),
                Mode::ClicksOnly => self.handle_clicks_only(event),
            }
        };
        self.pull_widget_events();
        consumed
    }

    fn starts_here(&self, event: &PointerEvent) -> bool {
        event.kind != PointerKind::Down || self.widget.bounds().contains(event.position)
    }

    fn handle_movable(&mut self, event: &PointerEvent) -> bool {
        if !self.starts_here(event) {
            return false;
        }
        if event.kind != PointerKind::Down && !self.classifier.is_tracking() {
            return false;
        }
        if event.kind == PointerKind::Down {
            self.drag_origin = Some(self.widget.bounds());
        }
        if event.kind == PointerKind::Cancel {
            self.cancel_drag();
        }

        match self.classifier.movable(event) {
            Some(GestureOutput::ScheduleLongPress { token, delay }) => {
                self.events
                    .push_back(NodeEvent::ScheduleLongPress { token, delay });
            }
            Some(GestureOutput::Move(motion)) => {
                match motion {
                    MoveEvent::MovingTo(offset) => {
                        if let Some(origin) = self.drag_origin {
                            self.widget.set_bounds(origin.offset(offset));
                        }
                    }
                    MoveEvent::MoveEnded(offset) => {
                        if let Some(origin) = self.drag_origin.take() {
                            self.widget.set_bounds(origin.offset(offset));
                        }
                    }
                    MoveEvent::Clicked | MoveEvent::LongClicked => {
                        self.drag_origin = None;
                    }
                }
                self.events.push_back(motion.into());
            }
            None => {}
        }
        if event.kind == PointerKind::Up {
            self.drag_origin = None;
        }
        true
    }

    fn handle_clicks_only(&mut self, event: &PointerEvent) -> bool {
        if !self.starts_here(event) {
            return false;
        }
        if event.kind != PointerKind::Down && !self.classifier.is_tracking() {
            return false;
        }
        if let Some(click) = self.classifier.clicks_only(event) {
            self.events.push_back(click.into());
        }
        true
    }

    /// Called by the host when the timer from [`NodeEvent::ScheduleLongPress`] fires.
    pub fn on_long_press(&mut self, token: TimerToken) {
        if let Some(event) = self.classifier.on_long_press(token) {
            self.events.push_back(event.into());
        }
    }

    pub fn tick(&mut self, now: Duration) {
        self.widget.tick(now);
        self.pull_widget_events();
    }

    pub fn expand(&mut self, now: Duration) {
        self.widget.expand(now);
        self.pull_widget_events();
    }

    pub fn collapse(&mut self, now: Duration) {
        self.widget.collapse(now);
        self.pull_widget_events();
    }

    pub fn on_blur_ready(&mut self, backdrop: Backdrop, now: Duration) {
        self.widget.on_blur_ready(backdrop, now);
        self.pull_widget_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WidgetEvent;
    use strum::IntoEnumIterator;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn node() -> MovableNode {
        let mut node = MovableNode::new(WidgetConfig::node());
        node.set_center(Point::new(138.0, 138.0));
        node.drain_events().count();
        node
    }

    fn moves(node: &mut MovableNode) -> Vec<MoveEvent> {
        node.drain_events()
            .filter_map(|e| match e {
                NodeEvent::Move(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("clicks_only".parse::<Mode>().unwrap(), Mode::ClicksOnly);
        assert_eq!("Expandable".parse::<Mode>().unwrap(), Mode::Expandable);
        let mode: Mode = serde_json::from_str(r#""movable""#).unwrap();
        assert_eq!(mode, Mode::Movable);
        assert_eq!(serde_json::to_string(&Mode::ClicksOnly).unwrap(), r#""clicks_only""#);
        assert_eq!(Mode::iter().count(), 3);
    }

    #[test]
    fn amount_rebuilds_primary() {
        let mut node = node();
        assert_eq!(node.widget().buttons().len(), 3);
        node.decrement_amount();
        assert_eq!(node.amount(), -1);
        let primary = node.widget().primary();
        assert_eq!(primary.text_lines(), ["-1"]);
        assert_eq!(primary.icon_handle().map(|i| i.as_str()), Some(NEGATIVE_NODE_ICON));

        node.increment_amount();
        node.increment_amount();
        assert_eq!(node.widget().primary().text_lines(), ["1"]);
        assert_eq!(
            node.widget().primary().icon_handle().map(|i| i.as_str()),
            Some(NODE_ICON)
        );
    }

    #[test]
    fn drag_of_ten_units_moves_the_node() {
        let mut node = node();
        assert!(node.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0))));
        assert!(node.drain_events().any(|e| matches!(e, NodeEvent::ScheduleLongPress { .. })));

        node.handle_pointer(&PointerEvent::moved(148.0, 138.0, ms(20)));
        node.handle_pointer(&PointerEvent::up(148.0, 138.0, ms(40)));

        let offset = crate::geometry::Vector::new(10.0, 0.0);
        assert_eq!(
            moves(&mut node),
            vec![MoveEvent::MovingTo(offset), MoveEvent::MoveEnded(offset)]
        );
        assert_eq!(node.center(), Point::new(148.0, 138.0));
    }

    #[test]
    fn long_press_reports_once_and_swallows_release() {
        let mut node = node();
        node.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0)));
        let token = node
            .drain_events()
            .find_map(|e| match e {
                NodeEvent::ScheduleLongPress { token, .. } => Some(token),
                _ => None,
            })
            .unwrap();

        node.on_long_press(token);
        node.handle_pointer(&PointerEvent::up(138.0, 138.0, ms(600)));
        assert_eq!(moves(&mut node), vec![MoveEvent::LongClicked]);
    }

    #[test]
    fn cancelled_drag_returns_home() {
        let mut node = node();
        node.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0)));
        node.handle_pointer(&PointerEvent::moved(180.0, 160.0, ms(20)));
        assert_eq!(node.center(), Point::new(180.0, 160.0));
        node.handle_pointer(&PointerEvent::cancel(ms(30)));
        assert_eq!(node.center(), Point::new(138.0, 138.0));
    }

    #[test]
    fn presses_elsewhere_are_not_taken() {
        let mut node = node();
        assert!(!node.handle_pointer(&PointerEvent::down(10.0, 10.0, ms(0))));
        assert!(!node.handle_pointer(&PointerEvent::up(10.0, 10.0, ms(10))));
        assert!(moves(&mut node).is_empty());
    }

    #[test]
    fn clicks_only_mode_never_moves() {
        let mut node = node();
        node.set_mode(Mode::ClicksOnly);
        node.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0)));
        node.handle_pointer(&PointerEvent::moved(160.0, 138.0, ms(10)));
        node.handle_pointer(&PointerEvent::up(139.0, 138.0, ms(20)));
        assert_eq!(moves(&mut node), vec![MoveEvent::Clicked]);
        assert_eq!(node.center(), Point::new(138.0, 138.0));
    }

    #[test]
    fn expandable_mode_reports_widget_events() {
        let mut node = node();
        node.set_mode(Mode::Expandable);
        node.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0)));
        node.handle_pointer(&PointerEvent::up(138.0, 138.0, ms(10)));

        let events: Vec<_> = node.drain_events().collect();
        assert!(events.contains(&NodeEvent::Widget(WidgetEvent::Expand)));
        assert!(!events.iter().any(|e| matches!(e, NodeEvent::Move(_))));
        assert!(node.widget().overlay_attached());

        // while expanded every touch belongs to the overlay, whatever the mode
        node.set_mode(Mode::Movable);
        assert!(node.handle_pointer(&PointerEvent::down(600.0, 600.0, ms(20))));
    }
}
