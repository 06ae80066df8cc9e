//! Easing curves mapping normalized progress in `[0, 1]` to an output curve.

/// Bounce-out curve: decelerates and settles with three shrinking rebounds.
pub fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

/// Straight fade from full (t = 0) to nothing (t = 1).
pub fn linear_fade(t: f64) -> f64 {
    (1.0 - t).clamp(0.0, 1.0)
}
