//! Configuration and runtime error types.
//!
//! The steady-state frame loop cannot fail: off-screen projections,
//! near-plane crossings, and out-of-range scalars are all resolved by the
//! recycle/clamp policies in [`crate::star`] and [`crate::color`].  Errors
//! exist only at the edges — configuration validation at startup and audio
//! backend initialisation — and both are surfaced before the loop starts.

use std::fmt;

/// Top-level error enum for the starfield simulation.
#[derive(Debug)]
pub enum SimError {
    /// A configured constant is outside its safe operating range.
    /// Returned by the validation helpers below; checked once at startup.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// The star pool would be empty.
    EmptyStarPool,

    /// The near plane is not strictly in front of the far plane.
    PlaneOrdering { near: f32, far: f32 },

    /// The respawn disc projects outside the viewport margin at the far
    /// plane, so a freshly recycled star could recycle again immediately.
    SpawnDiscTooWide {
        /// Worst-case projected offset of a respawned star (px).
        projected: f32,
        /// Largest offset that still lands inside the margin (px).
        limit: f32,
    },

    /// The audio capture backend could not be initialised.  Never fatal —
    /// the simulation degrades to zero audio intensity.
    AudioBackend { reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::EmptyStarPool => {
                write!(f, "star_count must be at least 1")
            }
            SimError::PlaneOrdering { near, far } => write!(
                f,
                "near_plane ({}) must be positive and strictly less than far_plane ({})",
                near, far
            ),
            SimError::SpawnDiscTooWide { projected, limit } => write!(
                f,
                "spawn_radius projects {} px from centre at the far plane, beyond the \
                 {} px viewport margin — recycled stars would recycle again immediately",
                projected, limit
            ),
            SimError::AudioBackend { reason } => {
                write!(f, "audio capture unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is a probability in `[0, 1]`.
pub fn validate_probability(name: &'static str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is a usable EMA coefficient in `(0, 1]`.
pub fn validate_smoothing(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is at least 1.0 (a speed multiplier).
pub fn validate_multiplier(name: &'static str, value: f32) -> SimResult<()> {
    if value >= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[1.0, ∞)",
        })
    }
}
