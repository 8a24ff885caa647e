//! Star colour ramps.
//!
//! [`color_for`] maps a normalised scalar — depth or speed, the caller
//! decides — onto a fixed blue→white→yellow→red gradient.  Inputs outside
//! `[0, 1]` are clamped, never rejected.

use bevy::prelude::*;

/// Gradient breakpoints as `(threshold, srgb byte triple)`.
///
/// Cold, far stars sit at the blue end; near, fast ones burn through white
/// and yellow into red.
const RAMP: [(f32, [u8; 3]); 4] = [
    (0.0, [80, 120, 200]),
    (0.33, [255, 255, 255]),
    (0.66, [255, 220, 80]),
    (1.0, [255, 100, 40]),
];

/// Greyscale range used when colour mode is toggled off.
const MONO_MIN: f32 = 60.0;
const MONO_MAX: f32 = 255.0;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `t ∈ [0, 1]` to a colour along the gradient.
///
/// Linear interpolation between the two breakpoints bracketing `t`; exact
/// breakpoint inputs return the breakpoint colour.  Out-of-range inputs are
/// clamped to the endpoints.
pub fn color_for(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mut lo = RAMP[0];
    for hi in RAMP.iter().skip(1) {
        if t <= hi.0 {
            let span = hi.0 - lo.0;
            let tt = if span > 0.0 { (t - lo.0) / span } else { 1.0 };
            return Color::srgb(
                lerp(lo.1[0] as f32, hi.1[0] as f32, tt) / 255.0,
                lerp(lo.1[1] as f32, hi.1[1] as f32, tt) / 255.0,
                lerp(lo.1[2] as f32, hi.1[2] as f32, tt) / 255.0,
            );
        }
        lo = *hi;
    }
    byte_color(RAMP[RAMP.len() - 1].1)
}

/// Greyscale fallback ramp: dim grey at the far plane up to white nearby.
pub fn mono_for(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let v = lerp(MONO_MIN, MONO_MAX, t) / 255.0;
    Color::srgb(v, v, v)
}

fn byte_color(rgb: [u8; 3]) -> Color {
    Color::srgb(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(c: Color) -> [f32; 3] {
        let s = c.to_srgba();
        [s.red, s.green, s.blue]
    }

    fn assert_close(actual: [f32; 3], expected: [u8; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - *e as f32 / 255.0).abs() < 1e-5,
                "expected {expected:?}, got {actual:?}"
            );
        }
    }

    #[test]
    fn endpoints_are_exact_breakpoint_colors() {
        assert_close(channels(color_for(0.0)), RAMP[0].1);
        assert_close(channels(color_for(1.0)), RAMP[3].1);
    }

    #[test]
    fn interior_breakpoints_are_exact() {
        assert_close(channels(color_for(0.33)), RAMP[1].1);
        assert_close(channels(color_for(0.66)), RAMP[2].1);
    }

    #[test]
    fn out_of_range_inputs_clamp_to_endpoints() {
        assert_eq!(color_for(-5.0), color_for(0.0));
        assert_eq!(color_for(7.3), color_for(1.0));
        assert_eq!(color_for(f32::NEG_INFINITY), color_for(0.0));
    }

    #[test]
    fn midpoint_of_first_segment_is_halfway_blue_to_white() {
        let mid = channels(color_for(0.165));
        // Halfway between (80, 120, 200) and (255, 255, 255).
        for (got, want) in mid.iter().zip([167.5, 187.5, 227.5]) {
            assert!((got - want / 255.0).abs() < 1e-3, "got {mid:?}");
        }
    }

    #[test]
    fn ramp_is_continuous_across_segment_joins() {
        for join in [0.33_f32, 0.66] {
            let below = channels(color_for(join - 1e-4));
            let above = channels(color_for(join + 1e-4));
            for (b, a) in below.iter().zip(above.iter()) {
                assert!((b - a).abs() < 0.01, "discontinuity at {join}");
            }
        }
    }

    #[test]
    fn mono_ramp_spans_grey_to_white() {
        let lo = channels(mono_for(0.0));
        let hi = channels(mono_for(1.0));
        assert!((lo[0] - 60.0 / 255.0).abs() < 1e-5);
        assert!((hi[0] - 1.0).abs() < 1e-5);
        assert_eq!(lo[0], lo[1]);
        assert_eq!(lo[1], lo[2]);
    }
}
