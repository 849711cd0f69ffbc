// Geometry and formatting helpers shared by the handlers and the demo.
use crate::model::Point;

pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// True when `v` is an exact multiple of 0.1 (allowing float noise).
pub fn is_multiple_of_tenth(v: f64) -> bool {
    let scaled = v * 10.0;
    (scaled - scaled.round()).abs() < 1e-6
}

pub fn format_duration_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{}ms", ms.round() as i64)
    }
}
