// Modality-local working state, grouped per handler.
use crate::host::TimerId;
use crate::model::{ImageRef, Point, PointerId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStart {
    pub position: Point,
    pub time_stamp: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragVars {
    /// Set when a pan begins; kept through a forced stop so a resumed pan can report.
    pub start: Option<DragStart>,
    /// Last seen position; cleared on stop.
    pub prev: Option<Point>,
    pub image: Option<ImageRef>,
    /// Pointer to capture once the threshold is crossed. `None` for resumed touch pans.
    pub pointer: Option<PointerId>,
    /// A `panstart` went out and its `panend` has not.
    pub session_open: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DblTapVars {
    /// Time of the last unpaired tap; zero when the window is closed.
    pub last_tapped: f64,
    pub last_position: Option<Point>,
    /// Pending pointer-down that may become a tap.
    pub down: Option<(PointerId, Point, f64)>,
    pub to: Option<TimerId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PinchVars {
    pub image: Option<ImageRef>,
    /// Inter-finger distance at pinch start.
    pub s_dst: f64,
    /// Current distance over `s_dst`.
    pub factor: f64,
    pub was_panning: bool,
    /// A synthetic `panstart` was emitted for a two-finger pan.
    pub synthetic_pan: bool,
    pub started_at: f64,
    pub start_mid: Point,
    pub last_mid: Point,
    /// Active touch/pen pointers (pointer-pinch only), at most two.
    pub pointers: Vec<(PointerId, Point)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateVars {
    pub to: Option<TimerId>,
    pub stack: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelVars {
    pub to: Option<TimerId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vars {
    pub drag: DragVars,
    pub dbltap: DblTapVars,
    pub pinch: PinchVars,
    pub updates: UpdateVars,
    pub wheel: WheelVars,
}
