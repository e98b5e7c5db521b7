//! Easing curves for reel motion

/// Clamp to the unit interval
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Ease-out cubic: fast start, decelerating into the stop, no overshoot.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}
