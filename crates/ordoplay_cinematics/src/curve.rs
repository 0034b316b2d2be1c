// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves sampled with normalized time.

use serde::{Deserialize, Serialize};

/// Anything that maps normalized time to an output scalar
pub trait Curve {
    /// Sample the curve. Output is not clamped.
    fn evaluate(&self, t: f32) -> f32;
}

impl<F> Curve for F
where
    F: Fn(f32) -> f32,
{
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// A key on an [`AnimationCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Input time
    pub time: f32,
    /// Output value at this key
    pub value: f32,
    /// Slope arriving at this key
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKey {
    /// Create a flat key (zero tangents)
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    /// Set both tangents
    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Keyed curve with cubic Hermite segments.
///
/// Outside the key range the first/last value is held. A curve without keys is the
/// identity, which keeps hand-written documents usable when `keys` is left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    keys: Vec<CurveKey>,
}

impl AnimationCurve {
    /// Create a curve from keys (sorted by time on construction)
    pub fn new(keys: Vec<CurveKey>) -> Self {
        let mut curve = Self { keys };
        curve.sort_keys();
        curve
    }

    /// Smoothstep from `(time_start, value_start)` to `(time_end, value_end)`
    pub fn ease_in_out(time_start: f32, value_start: f32, time_end: f32, value_end: f32) -> Self {
        Self::new(vec![
            CurveKey::new(time_start, value_start),
            CurveKey::new(time_end, value_end),
        ])
    }

    /// Straight line between two keys
    pub fn linear(time_start: f32, value_start: f32, time_end: f32, value_end: f32) -> Self {
        let span = time_end - time_start;
        let slope = if span.abs() > f32::EPSILON {
            (value_end - value_start) / span
        } else {
            0.0
        };
        Self::new(vec![
            CurveKey::new(time_start, value_start).with_tangents(slope, slope),
            CurveKey::new(time_end, value_end).with_tangents(slope, slope),
        ])
    }

    /// Curve that always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value)])
    }

    /// Add a key
    pub fn add_key(&mut self, key: CurveKey) {
        self.keys.push(key);
        self.sort_keys();
    }

    /// Get all keys
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    fn sort_keys(&mut self) {
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self::ease_in_out(0.0, 0.0, 1.0, 1.0)
    }
}

impl Curve for AnimationCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return t,
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; guaranteed to exist and be > 0 after the range checks
        let next = self.keys.partition_point(|k| k.time <= t);
        let a = &self.keys[next - 1];
        let b = &self.keys[next];

        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        let s = (t - a.time) / span;
        hermite(a.value, a.out_tangent * span, b.value, b.in_tangent * span, s)
    }
}

/// Cubic Hermite basis
fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_ease_in_out_endpoints_and_midpoint() {
        let curve = AnimationCurve::default();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(0.5), 0.5);
        assert_eq!(curve.evaluate(1.0), 1.0);
        // Smoothstep is slower than linear near the start
        assert!(curve.evaluate(0.1) < 0.1);
        assert!(curve.evaluate(0.9) > 0.9);
    }

    #[test]
    fn test_clamped_outside_key_range() {
        let curve = AnimationCurve::default();
        assert_eq!(curve.evaluate(-2.0), 0.0);
        assert_eq!(curve.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_linear_curve() {
        let curve = AnimationCurve::linear(0.0, 0.0, 1.0, 2.0);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.evaluate(t) - 2.0 * t).abs() < EPSILON);
        }
    }

    #[test]
    fn test_overshoot_is_not_clamped() {
        let curve = AnimationCurve::new(vec![
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.7, 1.2),
            CurveKey::new(1.0, 1.0),
        ]);
        assert!((curve.evaluate(0.7) - 1.2).abs() < EPSILON);
        assert!(curve.evaluate(0.8) > 1.0);
    }

    #[test]
    fn test_keys_sorted_on_insert() {
        let mut curve = AnimationCurve::constant(0.0);
        curve.add_key(CurveKey::new(2.0, 4.0));
        curve.add_key(CurveKey::new(1.0, 1.0));
        let times: Vec<f32> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_curve_is_identity() {
        let curve = AnimationCurve::new(Vec::new());
        assert_eq!(curve.evaluate(0.25), 0.25);
    }

    #[test]
    fn test_closure_curve() {
        let square = |t: f32| t * t;
        assert_eq!(square.evaluate(0.5), 0.25);
    }
}
