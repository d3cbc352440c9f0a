//! Packet loss concealment per ITU-T G.711 Appendix I.
//!
//! A `Plc` instance consumes one 80-sample frame per 10 ms slot through
//! either `good_frame` (frame arrived) or `bad_frame` (frame lost) and
//! always produces a full output frame. Output trails input by
//! `OUTPUT_LAG` samples; the deferred samples are what the concealer
//! fades into when real audio resumes after a burst of losses.

use std::f32::consts::PI;

use crate::params::*;

/// Convert a synthesized value to a PCM sample: truncate toward zero,
/// saturating at the 16-bit rails.
#[inline]
fn clamp_sample(x: f32) -> i16 {
    x.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Stateful packet loss concealer for one 8 kHz audio stream.
///
/// Calls must be made in strict stream order, one per frame slot. The
/// instance owns all of its buffers; per-stream use means one instance
/// per stream.
pub struct Plc {
    /// Rolling window of the last `HIST_LEN` output-aligned samples.
    hist: [i16; HIST_LEN],
    /// Snapshot of the history tail taken at the onset of an erasure
    /// burst; read-only source of the synthetic signal for that burst.
    pitch_buf: [i16; PITCH_BUF_LEN],
    /// Consecutive bad frames in the current burst; 0 in clean state.
    erasure_count: u32,
    /// Pitch period estimated at the last burst onset, in samples.
    pitch_wavelen: usize,
    quarter_wavelen: usize,
    /// Pitch periods replayed per synthesis cycle: 1, then 2, then 3 as
    /// the burst lengthens. Longer cycles avoid buzzy one-period loops.
    pitch_wave_count: usize,
    /// Read index into `pitch_buf`.
    pitch_buf_ptr: usize,
    /// Gain applied to each synthetic sample.
    attenuation: f32,
    /// Per-sample additive change to `attenuation`; 0 through the first
    /// erasure frame, negative thereafter.
    attenuation_delta: f32,
    /// Hann ramp 0 -> 1 over a quarter wavelength; the first
    /// `quarter_wavelen` entries are valid.
    blend_coef: [f32; PITCH_PERIOD_MAX / 4],
}

impl Default for Plc {
    fn default() -> Self {
        Self::new()
    }
}

impl Plc {
    pub fn new() -> Self {
        Self {
            hist: [0; HIST_LEN],
            pitch_buf: [0; PITCH_BUF_LEN],
            erasure_count: 0,
            pitch_wavelen: 0,
            quarter_wavelen: 0,
            pitch_wave_count: 1,
            pitch_buf_ptr: 0,
            attenuation: 1.0,
            attenuation_delta: 0.0,
            blend_coef: [0.0; PITCH_PERIOD_MAX / 4],
        }
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Pitch period in samples as estimated at the onset of the last
    /// erasure burst. Meaningful only after at least one bad frame;
    /// returns 0 before that.
    pub fn pitch_wavelength(&self) -> usize {
        self.pitch_wavelen
    }

    /// Process a frame that arrived. `input` and `output` must both be
    /// exactly `FRAME_LEN` samples; output is the input delayed by
    /// `OUTPUT_LAG` samples, cross-faded out of synthesis if this frame
    /// ends an erasure burst.
    pub fn good_frame(&mut self, input: &[i16], output: &mut [i16]) {
        assert_eq!(input.len(), FRAME_LEN, "input frame must be {FRAME_LEN} samples");
        assert_eq!(output.len(), FRAME_LEN, "output frame must be {FRAME_LEN} samples");

        self.shift_hist();
        self.hist[HIST_LEN - FRAME_LEN..].copy_from_slice(input);

        if self.erasure_count > 0 {
            self.rejoin_real_frame(output);
            self.erasure_count = 0;
        } else {
            let base = HIST_LEN - FRAME_LEN - OUTPUT_LAG;
            output.copy_from_slice(&self.hist[base..base + FRAME_LEN]);
        }
    }

    /// Produce a frame of synthetic audio for a known-lost slot.
    /// `output` must be exactly `FRAME_LEN` samples.
    pub fn bad_frame(&mut self, output: &mut [i16]) {
        assert_eq!(output.len(), FRAME_LEN, "output frame must be {FRAME_LEN} samples");

        self.erasure_count += 1;
        match self.erasure_count {
            1 => {
                // Burst onset: capture the freshest history and find the
                // pitch period to replay.
                self.pitch_buf
                    .copy_from_slice(&self.hist[HIST_LEN - PITCH_BUF_LEN..]);
                self.compute_pitch_period();
                self.attenuation = 1.0;
                self.attenuation_delta = 0.0;
                self.pitch_wave_count = 1;
            }
            2 => {
                // Phase is preserved: only the cycle length changes.
                self.pitch_wave_count = 2;
                self.attenuation_delta = -ATTEN_PER_FRAME / FRAME_LEN as f32;
            }
            3 => self.pitch_wave_count = 3,
            _ => {}
        }

        self.shift_hist();

        // Write each synthetic sample into the slot a real frame would
        // have been read from, so a later pitch estimate still sees a
        // coherent signal.
        let base = HIST_LEN - FRAME_LEN - OUTPUT_LAG;
        for i in 0..FRAME_LEN {
            let s = self.synthetic_sample();
            output[i] = s;
            self.hist[base + i] = s;
        }
    }

    fn shift_hist(&mut self) {
        self.hist.copy_within(FRAME_LEN.., 0);
    }

    /// Normalized autocorrelation score of the history tail against
    /// itself `tap` samples earlier, sampled every `step` positions.
    fn tap_score(&self, tap: usize, step: usize) -> f32 {
        let p1 = PITCH_BUF_LEN - CORR_LEN;
        let p0 = PITCH_BUF_LEN - CORR_LEN - tap;
        let mut energy = 0.0f32;
        let mut corr = 0.0f32;
        for i in (0..CORR_LEN).step_by(step) {
            let s0 = self.pitch_buf[p0 + i] as f32;
            let s1 = self.pitch_buf[p1 + i] as f32;
            energy += s0 * s0;
            corr += s0 * s1;
        }
        (corr / energy.max(MIN_POWER).sqrt()).abs()
    }

    /// Two-pass pitch search over the snapshot in `pitch_buf`, then
    /// rebuild the wrap-fade ramp and position the read pointer.
    fn compute_pitch_period(&mut self) {
        // Coarse pass over every other tap, longest period first. The
        // strict '>' keeps the longer period on a tie; silent history
        // resolves to the longest period.
        let mut best_tap = PITCH_PERIOD_MAX;
        let mut best_score = 0.0f32;
        for tap in (PITCH_PERIOD_MIN..=PITCH_PERIOD_MAX).rev().step_by(2) {
            let score = self.tap_score(tap, 2);
            if score > best_score {
                best_score = score;
                best_tap = tap;
            }
        }

        // Fine pass over the adjacent taps at full resolution. The '>='
        // biases refinement toward the shorter of equal-scoring taps.
        let lo = (best_tap - 1).max(PITCH_PERIOD_MIN);
        let hi = (best_tap + 1).min(PITCH_PERIOD_MAX);
        best_score = 0.0;
        for tap in (lo..=hi).rev() {
            let score = self.tap_score(tap, 1);
            if score >= best_score {
                best_score = score;
                best_tap = tap;
            }
        }

        self.pitch_wavelen = best_tap;
        self.quarter_wavelen = best_tap / 4;

        // Hann half-cycle over a quarter wavelength, rising 0 -> 1.
        for i in 0..self.quarter_wavelen {
            self.blend_coef[i] =
                0.5 - 0.5 * (PI * i as f32 / self.quarter_wavelen as f32).cos();
        }

        // Start reading at the lag point: the first synthetic samples are
        // exactly what would have been output had the frame arrived.
        self.pitch_buf_ptr = PITCH_BUF_LEN - OUTPUT_LAG;
    }

    /// Produce one synthetic sample and advance the synthesis state.
    fn synthetic_sample(&mut self) -> i16 {
        debug_assert!(self.pitch_buf_ptr < PITCH_BUF_LEN);
        let cycle = self.pitch_wavelen * self.pitch_wave_count;
        debug_assert!(cycle <= PITCH_BUF_LEN);

        let s0 = self.pitch_buf[self.pitch_buf_ptr] as f32;
        let mut sample = s0;

        // Inside the last quarter wavelength, fade toward the sample one
        // cycle back so the wrap to the loop start stays continuous.
        let fade_start = PITCH_BUF_LEN - self.quarter_wavelen;
        if self.pitch_buf_ptr >= fade_start {
            debug_assert!(cycle <= self.pitch_buf_ptr);
            let blend = self.blend_coef[self.pitch_buf_ptr - fade_start];
            let s1 = self.pitch_buf[self.pitch_buf_ptr.saturating_sub(cycle)] as f32;
            sample = s0 * (1.0 - blend) + s1 * blend;
        }

        self.pitch_buf_ptr += 1;
        if self.pitch_buf_ptr == PITCH_BUF_LEN {
            self.pitch_buf_ptr = PITCH_BUF_LEN - cycle;
        }

        sample *= self.attenuation;
        self.attenuation = (self.attenuation + self.attenuation_delta).clamp(0.0, 1.0);
        clamp_sample(sample)
    }

    /// Cross-fade the synthetic tail into newly arrived real audio at the
    /// end of an erasure burst. `hist` already holds the new frame.
    fn rejoin_real_frame(&mut self, output: &mut [i16]) {
        let base = HIST_LEN - FRAME_LEN - OUTPUT_LAG;

        // The first OUTPUT_LAG output positions belong to the time slot
        // before the frame that just arrived: still in erasure. The
        // history overwrite keeps the tail pitch-coherent for any burst
        // that follows immediately.
        for i in 0..OUTPUT_LAG {
            let s = self.synthetic_sample();
            output[i] = s;
            self.hist[base + i] = s;
        }

        // The fade widens by 4 ms per additional erasure to hide the
        // phase drift a longer burst accumulates.
        let fade_len = (self.quarter_wavelen + 32 * (self.erasure_count as usize - 1))
            .min(FRAME_LEN - OUTPUT_LAG);
        let mut blend = [0.0f32; FRAME_LEN - OUTPUT_LAG];
        for (j, b) in blend[..fade_len].iter_mut().enumerate() {
            *b = 0.5 - 0.5 * (PI * j as f32 / fade_len as f32).cos();
        }

        let mut i = OUTPUT_LAG;
        for &b in &blend[..fade_len] {
            let synth = self.synthetic_sample() as f32;
            let real = self.hist[base + i] as f32;
            let s = clamp_sample(synth * (1.0 - b) + real * b);
            output[i] = s;
            self.hist[base + i] = s;
            i += 1;
        }

        // Past the fade the deferred real samples pass through unchanged.
        for k in i..FRAME_LEN {
            output[k] = self.hist[base + k];
        }
    }
}
