//! Radial expanding buttons and movable board nodes, independent of any
//! toolkit. Hosts supply pointer input, a clock and a [`surface::Surface`].

pub mod blur;
pub mod button;
pub mod color;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod expansion;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod node;
pub mod overlay;
pub mod ripple;
pub mod surface;
pub mod timeline;
pub mod widget;

pub use config::WidgetConfig;
pub use error::{ConfigurationError, RenderError};
pub use events::{Layer, MoveEvent, NodeEvent, WidgetEvent};
pub use node::{Mode, MovableNode};
pub use widget::RadialButton;
