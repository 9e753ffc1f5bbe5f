//! The play area: a set of nodes sharing one pointer stream.

use crate::config::Config;
use bloom::blur::Backdrop;
use bloom::color::Color;
use bloom::geometry::{Point, Rect};
use bloom::gesture::TimerToken;
use bloom::input::{PointerEvent, PointerKind};
use bloom::surface::Surface;
use bloom::{Layer, Mode, MoveEvent, MovableNode, NodeEvent, RenderError, WidgetEvent};
use std::time::Duration;

/// Popup index that takes one from the node.
pub const TAKE_BUTTON: usize = 1;
/// Popup index that gives one to the node.
pub const GIVE_BUTTON: usize = 2;

/// Something the GTK side has to do after the board changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardAction {
    ScheduleLongPress {
        node: usize,
        token: TimerToken,
        delay: Duration,
    },
    RequestBlur {
        node: usize,
        radius: f64,
    },
    ShowOverlay(usize),
    HideOverlay(usize),
    Redraw(Layer),
}

/// Keyboard shortcut for switching every node's mode.
pub fn mode_for_key(key: char) -> Option<Mode> {
    match key.to_ascii_lowercase() {
        'b' => Some(Mode::Movable),
        's' => Some(Mode::Expandable),
        'c' => Some(Mode::ClicksOnly),
        _ => None,
    }
}

#[derive(Debug)]
pub struct Board {
    nodes: Vec<MovableNode>,
    mode: Mode,
    /// Node that took the current press, if any.
    owner: Option<usize>,
    /// Amount changes chosen from a popup, applied once it has collapsed.
    pending: Vec<i64>,
}

impl Board {
    pub fn new(config: &Config) -> Self {
        let nodes: Vec<MovableNode> = config
            .nodes
            .iter()
            .map(|n| {
                let mut node = MovableNode::new(config.widget.clone());
                node.set_amount(n.amount);
                node.set_center(Point::new(n.x, n.y));
                node.set_mode(config.mode);
                node.drain_events().count();
                node
            })
            .collect();
        let pending = vec![0; nodes.len()];
        Self {
            nodes,
            mode: config.mode,
            owner: None,
            pending,
        }
    }

    pub fn nodes(&self) -> &[MovableNode] {
        &self.nodes
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_node_background(&mut self, background: Color) {
        for node in &mut self.nodes {
            node.set_primary_background(background);
            node.drain_events().count();
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<BoardAction> {
        if mode == self.mode {
            return Vec::new();
        }
        log::info!("switching board to {mode}");
        self.mode = mode;
        self.owner = None;
        for node in &mut self.nodes {
            node.set_mode(mode);
        }
        let mut actions = self.collect();
        actions.push(BoardAction::Redraw(Layer::Widget));
        actions
    }

    /// The node whose overlay currently covers the board.
    pub fn expanded(&self) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.widget().overlay_attached())
    }

    pub fn is_animating(&self) -> bool {
        self.nodes.iter().any(|n| n.widget().is_animating())
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<BoardAction> {
        if let Some(index) = self.expanded() {
            self.nodes[index].handle_pointer(event);
            self.owner = None;
            return self.collect();
        }

        match event.kind {
            PointerKind::Down => {
                // topmost node is drawn last
                self.owner = (0..self.nodes.len())
                    .rev()
                    .find(|&i| self.nodes[i].handle_pointer(event));
            }
            PointerKind::Move => {
                if let Some(index) = self.owner {
                    self.nodes[index].handle_pointer(event);
                }
            }
            PointerKind::Up | PointerKind::Cancel => {
                if let Some(index) = self.owner.take() {
                    self.nodes[index].handle_pointer(event);
                }
            }
        }
        self.collect()
    }

    pub fn on_long_press(&mut self, node: usize, token: TimerToken) -> Vec<BoardAction> {
        if let Some(n) = self.nodes.get_mut(node) {
            n.on_long_press(token);
        }
        self.collect()
    }

    pub fn on_blur_ready(
        &mut self,
        node: usize,
        backdrop: Backdrop,
        now: Duration,
    ) -> Vec<BoardAction> {
        match self.nodes.get_mut(node) {
            Some(n) => n.on_blur_ready(backdrop, now),
            None => log::warn!("blurred backdrop for unknown node {node}"),
        }
        self.collect()
    }

    pub fn tick(&mut self, now: Duration) -> Vec<BoardAction> {
        for node in &mut self.nodes {
            node.tick(now);
        }
        self.collect()
    }

    pub fn collapse_all(&mut self, now: Duration) -> Vec<BoardAction> {
        for node in &mut self.nodes {
            if node.widget().is_expanded() {
                node.collapse(now);
            }
        }
        self.collect()
    }

    fn collect(&mut self) -> Vec<BoardAction> {
        let mut actions = Vec::new();
        for index in 0..self.nodes.len() {
            let events: Vec<NodeEvent> = self.nodes[index].drain_events().collect();
            for event in events {
                self.react(index, event, &mut actions);
            }
        }
        actions.dedup();
        actions
    }

    fn react(&mut self, index: usize, event: NodeEvent, actions: &mut Vec<BoardAction>) {
        match event {
            NodeEvent::ScheduleLongPress { token, delay } => {
                actions.push(BoardAction::ScheduleLongPress {
                    node: index,
                    token,
                    delay,
                });
            }
            NodeEvent::Move(motion) => {
                match motion {
                    MoveEvent::MovingTo(_) => log::trace!("node {index}: {motion:?}"),
                    _ => log::info!("node {index}: {motion:?}"),
                }
                actions.push(BoardAction::Redraw(Layer::Widget));
            }
            NodeEvent::Widget(event) => match event {
                WidgetEvent::PopupButtonClicked(button) => {
                    log::info!("node {index}: popup button {button}");
                    self.pending[index] += match button {
                        TAKE_BUTTON => -1,
                        GIVE_BUTTON => 1,
                        _ => 0,
                    };
                }
                WidgetEvent::CollapseFinished => {
                    let delta = std::mem::take(&mut self.pending[index]);
                    if delta != 0 {
                        let node = &mut self.nodes[index];
                        node.set_amount(node.amount() + delta);
                        log::info!("node {index} now holds {}", node.amount());
                        actions.push(BoardAction::Redraw(Layer::Widget));
                    }
                }
                WidgetEvent::OverlayAttached => actions.push(BoardAction::ShowOverlay(index)),
                WidgetEvent::OverlayDetached => actions.push(BoardAction::HideOverlay(index)),
                WidgetEvent::BlurRequested(request) => actions.push(BoardAction::RequestBlur {
                    node: index,
                    radius: request.radius,
                }),
                WidgetEvent::Invalidate(layer) => actions.push(BoardAction::Redraw(layer)),
                WidgetEvent::Expand | WidgetEvent::Collapse => {
                    log::debug!("node {index}: {event:?}");
                }
            },
        }
    }

    /// Paints every collapsed node at its place on the board.
    pub fn draw_play_area<S: Surface>(&self, surface: &mut S) -> Result<(), RenderError> {
        for node in &self.nodes {
            let origin = node.bounds().origin();
            surface
                .save()
                .map_err(|e| RenderError::Surface(e.to_string()))?;
            surface.translate(origin.x, origin.y);
            let drawn = node.widget().render_widget(surface);
            surface
                .restore()
                .map_err(|e| RenderError::Surface(e.to_string()))?;
            drawn?;
        }
        Ok(())
    }

    pub fn draw_overlay<S: Surface>(
        &self,
        surface: &mut S,
        viewport: Rect,
    ) -> Result<(), RenderError> {
        match self.expanded() {
            Some(index) => self.nodes[index].widget().render_overlay(surface, viewport),
            None => Ok(()),
        }
    }
}
