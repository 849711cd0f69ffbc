pub mod context;
pub mod vars;

pub use context::EventContext;
pub use vars::{DblTapVars, DragStart, DragVars, PinchVars, UpdateVars, Vars, WheelVars};
