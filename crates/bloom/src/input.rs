use crate::geometry::Point;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single-pointer input sample in root-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Host clock reading, same clock as animation ticks.
    pub time: Duration,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, time: Duration) -> Self {
        Self {
            kind,
            position,
            time,
        }
    }

    pub fn down(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerKind::Down, Point::new(x, y), time)
    }

    pub fn moved(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerKind::Move, Point::new(x, y), time)
    }

    pub fn up(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerKind::Up, Point::new(x, y), time)
    }

    pub fn cancel(time: Duration) -> Self {
        Self::new(PointerKind::Cancel, Point::default(), time)
    }
}
