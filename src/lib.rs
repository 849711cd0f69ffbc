//! Input coordination for a deep-zoom viewer element.
//!
//! Mouse drag, touch and pointer pinch, trackpad gestures, wheel, keyboard and
//! double tap are turned into one non-conflicting stream of camera commands
//! and engine notifications. [`InputSystem`] is the entry point: build it with
//! the element's [`Stage`], [`Engine`] and [`Host`], call `hook`, and feed it
//! native events (directly, or through [`web::WebHost`] in a browser).

pub mod config;
pub mod handlers;
pub mod host;
pub mod model;
pub mod state;
pub mod system;
pub mod testing;
pub mod util;
pub mod web;

pub use config::{ConfigError, InputConfig, Platform};
pub use handlers::{GestureStop, Outcome, StopOptions};
pub use host::{Camera, Engine, Host, Listener, Stage, Timer, TimerId};
pub use model::{NativeEvent, Point, ViewerEvent, Viewport};
pub use state::EventContext;
pub use system::InputSystem;
