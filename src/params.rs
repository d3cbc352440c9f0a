/// Sample rate in Hz. Conformance is defined at 8 kHz only.
pub const SAMPLE_RATE: f64 = 8000.0;

/// Samples per frame (10 ms at 8 kHz).
pub const FRAME_LEN: usize = 80;

/// Shortest tracked pitch period in samples (200 Hz).
pub const PITCH_PERIOD_MIN: usize = 40;

/// Longest tracked pitch period in samples (66.7 Hz).
pub const PITCH_PERIOD_MAX: usize = 120;

/// Correlation window length for the pitch search (20 ms).
pub const CORR_LEN: usize = 160;

/// History ring length (48.75 ms, ~3.25 max pitch periods).
pub const HIST_LEN: usize = 390;

/// Pitch buffer length: three complete cycles at the lowest pitch.
pub const PITCH_BUF_LEN: usize = 3 * PITCH_PERIOD_MAX;

/// Fixed delay between input arrival and output emission, one quarter of
/// the longest pitch period. The deferred samples give the re-entry mixer
/// real audio to fade into when a burst of erasures ends.
pub const OUTPUT_LAG: usize = PITCH_PERIOD_MAX / 4;

/// Correlation energy floor. Keeps the normalized score finite on
/// near-silent history.
pub const MIN_POWER: f32 = 250.0;

/// Attenuation applied per frame starting with the second erasure.
pub const ATTEN_PER_FRAME: f32 = 0.20;
