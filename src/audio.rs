//! Audio reactivity: level cell, smoothing envelope, and optional capture.
//!
//! The capture backend (behind the `audio` cargo feature) runs on its own
//! cpal thread and publishes a single intensity scalar.  The frame loop
//! reads that scalar once per tick through [`AudioLevel`] — a one-writer,
//! one-reader, last-value-wins handoff with no queue, so the worst case is
//! one capture interval of staleness.  Without the feature (or when no
//! input device exists) the cell simply stays at zero.

use bevy::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Single-slot intensity handoff between the capture thread and the frame
/// loop.  Stores the f32 as raw bits in an `AtomicU32`, so reads can never
/// tear.
#[derive(Resource, Clone, Default)]
pub struct AudioLevel(Arc<AtomicU32>);

impl AudioLevel {
    pub fn read(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn write(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Whether a capture backend was successfully started; read by the `A`
/// toggle so it can explain itself instead of silently doing nothing.
#[derive(Resource, Default)]
pub struct AudioSupport {
    pub available: bool,
}

/// Exponential-moving-average smoother for the raw intensity signal.
///
/// `smoothed = smoothed × (1 − α) + raw × α`, α ∈ (0, 1].  Keeps the speed
/// modulation from flickering with every FFT block.
#[derive(Resource, Debug)]
pub struct AudioEnvelope {
    alpha: f32,
    smoothed: f32,
}

impl AudioEnvelope {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(1e-3, 1.0),
            smoothed: 0.0,
        }
    }

    /// Fold one raw sample into the envelope and return the new level.
    pub fn update(&mut self, raw: f32) -> f32 {
        self.smoothed = self.smoothed * (1.0 - self.alpha) + raw.max(0.0) * self.alpha;
        self.smoothed
    }

    /// Current smoothed level.
    pub fn level(&self) -> f32 {
        self.smoothed
    }
}

/// Fold the latest captured level into the envelope, once per tick.
pub fn audio_envelope_system(level: Res<AudioLevel>, mut envelope: ResMut<AudioEnvelope>) {
    envelope.update(level.read());
}

/// Microphone capture backend: cpal input stream + FFT level analysis.
#[cfg(feature = "audio")]
pub mod capture {
    use super::AudioLevel;
    use crate::error::{SimError, SimResult};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use rustfft::{num_complex::Complex, FftPlanner};
    use std::f32::consts::PI;

    /// FFT block size; input blocks larger than this are truncated, smaller
    /// ones zero-padded.
    const FFT_SIZE: usize = 1024;

    /// Keeps the cpal stream alive; capture stops when this is dropped.
    pub struct CaptureStream {
        _stream: cpal::Stream,
    }

    /// Open the default input device and start publishing a normalised
    /// intensity level into `level`.
    ///
    /// Every failure path returns [`SimError::AudioBackend`] — the caller
    /// logs it and runs without reactivity.
    pub fn start(level: AudioLevel) -> SimResult<CaptureStream> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| SimError::AudioBackend {
                reason: "no default input device".into(),
            })?;
        let config = device
            .default_input_config()
            .map_err(|e| SimError::AudioBackend {
                reason: format!("no default input config: {e}"),
            })?;
        let channels = config.channels() as usize;

        // Plan the FFT and precompute the Hann window once; both move into
        // the capture callback.
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / FFT_SIZE as f32).cos()))
            .collect();
        let mut buffer = vec![Complex::new(0.0_f32, 0.0); FFT_SIZE];

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let frames = (data.len() / channels.max(1)).min(FFT_SIZE);
                    for i in 0..frames {
                        let mut mono = 0.0;
                        for c in 0..channels {
                            mono += data[i * channels + c];
                        }
                        mono /= channels as f32;
                        buffer[i] = Complex::new(mono * window[i], 0.0);
                    }
                    for slot in buffer.iter_mut().skip(frames) {
                        *slot = Complex::new(0.0, 0.0);
                    }
                    fft.process(&mut buffer);

                    // Mean magnitude over the positive-frequency half, with
                    // the same rough ×10 normalisation the effect was tuned
                    // against; clamped so a shout can't triple star speed.
                    let half = FFT_SIZE / 2;
                    let mean: f32 =
                        buffer[..half].iter().map(|c| c.norm()).sum::<f32>() / half as f32;
                    level.write((mean * 10.0).clamp(0.0, 1.5));
                },
                move |err| {
                    bevy::log::warn!("audio capture stream error: {err}");
                },
                None,
            )
            .map_err(|e| SimError::AudioBackend {
                reason: format!("failed to build input stream: {e}"),
            })?;

        stream.play().map_err(|e| SimError::AudioBackend {
            reason: format!("failed to start input stream: {e}"),
        })?;

        Ok(CaptureStream { _stream: stream })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_cell_round_trips() {
        let level = AudioLevel::default();
        assert_eq!(level.read(), 0.0);
        level.write(0.75);
        assert!((level.read() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn level_cell_clones_share_the_slot() {
        let writer = AudioLevel::default();
        let reader = writer.clone();
        writer.write(1.25);
        assert!((reader.read() - 1.25).abs() < f32::EPSILON);
    }

    #[test]
    fn alpha_one_passes_raw_through() {
        let mut env = AudioEnvelope::new(1.0);
        assert_eq!(env.update(0.9), 0.9);
        assert_eq!(env.update(0.1), 0.1);
    }

    #[test]
    fn envelope_converges_toward_a_held_level() {
        let mut env = AudioEnvelope::new(0.25);
        for _ in 0..100 {
            env.update(1.0);
        }
        assert!((env.level() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn envelope_decays_to_zero_in_silence() {
        let mut env = AudioEnvelope::new(0.25);
        env.update(1.0);
        for _ in 0..100 {
            env.update(0.0);
        }
        assert!(env.level() < 1e-6);
    }

    #[test]
    fn envelope_smooths_rather_than_jumps() {
        let mut env = AudioEnvelope::new(0.25);
        let first = env.update(1.0);
        assert!((first - 0.25).abs() < 1e-6, "one step of α=0.25 from zero");
    }

    #[test]
    fn negative_raw_levels_are_treated_as_silence() {
        let mut env = AudioEnvelope::new(0.5);
        env.update(-4.0);
        assert_eq!(env.level(), 0.0);
    }
}
