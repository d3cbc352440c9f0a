//! End-to-end concealment tests: a phase-continuous tone interrupted by
//! frame losses, checked frame by frame against the delay contract, the
//! attenuation ramp, and the resumption cross-fade.

use g711_plc::params::{FRAME_LEN, OUTPUT_LAG, SAMPLE_RATE};
use g711_plc::Plc;

const TONE_HZ: f64 = 85.0;
const AMPLITUDE: f64 = 0.5 * 32767.0;

/// Generate `n` frames of a phase-continuous cosine.
fn tone_frames(freq: f64, n: usize) -> Vec<[i16; FRAME_LEN]> {
    let omega = 2.0 * std::f64::consts::PI * freq / SAMPLE_RATE;
    let mut phase: f64 = 0.0;
    (0..n)
        .map(|_| {
            let mut frame = [0i16; FRAME_LEN];
            for s in frame.iter_mut() {
                *s = (AMPLITUDE * phase.cos()) as i16;
                phase += omega;
            }
            frame
        })
        .collect()
}

fn rms(samples: &[i16]) -> f64 {
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

fn energy(samples: &[i16]) -> f64 {
    samples.iter().map(|&s| (s as f64) * (s as f64)).sum()
}

/// Run a loss pattern over a tone, returning (input stream, output stream).
fn run_pattern(freq: f64, n: usize, lost: &[usize]) -> (Vec<i16>, Vec<i16>) {
    let frames = tone_frames(freq, n);
    let mut plc = Plc::new();
    let mut input = Vec::new();
    let mut output = Vec::new();
    let mut out = [0i16; FRAME_LEN];
    for (j, frame) in frames.iter().enumerate() {
        if lost.contains(&j) {
            plc.bad_frame(&mut out);
        } else {
            plc.good_frame(frame, &mut out);
        }
        input.extend_from_slice(frame);
        output.extend_from_slice(&out);
    }
    (input, output)
}

#[test]
fn test_twelve_frame_fixture() {
    let lost = [4usize, 5, 8, 9, 10, 11];
    let (input, output) = run_pattern(TONE_HZ, 12, &lost);
    let frame = |j: usize| &output[j * FRAME_LEN..(j + 1) * FRAME_LEN];

    // Frames 0..3: input delayed by the lag, zero-padded at the start.
    for n in 0..4 * FRAME_LEN {
        let expected = if n < OUTPUT_LAG {
            0
        } else {
            input[n - OUTPUT_LAG]
        };
        assert_eq!(output[n], expected, "clean region mismatch at sample {n}");
    }

    // Frames 4 and 5: pitch-periodic synthesis of comparable energy.
    let tone_rms = rms(&input[..4 * FRAME_LEN]);
    assert!(rms(frame(4)) >= 0.5 * tone_rms);
    assert!(rms(frame(5)) >= 0.5 * tone_rms);

    // Frame 6 starts with lag samples that are still synthetic, then
    // fades into the real signal; by frame 7 the output is exactly the
    // delayed input again.
    assert!(rms(&frame(6)[..OUTPUT_LAG]) > 0.0);
    for i in 0..FRAME_LEN {
        let n = 7 * FRAME_LEN + i;
        assert_eq!(
            output[n],
            input[n - OUTPUT_LAG],
            "frame 7 should be clean passthrough at sample {i}"
        );
    }

    // Frames 9..11: the long burst attenuates monotonically.
    let e8 = energy(frame(8));
    let e9 = energy(frame(9));
    let e10 = energy(frame(10));
    let e11 = energy(frame(11));
    assert!(e8 >= e9, "energy rose from frame 8 ({e8}) to 9 ({e9})");
    assert!(e9 > e10, "energy rose from frame 9 ({e9}) to 10 ({e10})");
    assert!(e10 > e11, "energy rose from frame 10 ({e10}) to 11 ({e11})");
}

#[test]
fn test_reentry_has_no_click() {
    // 5 good, 2 bad, 5 good: the largest sample-to-sample step around the
    // resumption must stay comparable to the steady-state slope.
    let (_, output) = run_pattern(TONE_HZ, 12, &[5, 6]);

    let max_diff = |range: std::ops::Range<usize>| -> i32 {
        range
            .map(|n| (output[n] as i32 - output[n - 1] as i32).abs())
            .max()
            .unwrap()
    };

    // Steady-state slope, measured well clear of the lead-in zeros.
    let steady = max_diff(2 * FRAME_LEN..5 * FRAME_LEN);

    // The junction into the resumption frame plus its cross-fade.
    let boundary = max_diff(7 * FRAME_LEN - OUTPUT_LAG..8 * FRAME_LEN);

    assert!(
        boundary as f64 <= 1.5 * steady as f64,
        "boundary step {boundary} vs steady slope {steady}"
    );
}

#[test]
fn test_burst_energy_monotone_in_length() {
    // Total synthetic energy for a k-frame burst decreases in k from the
    // second frame on.
    let mut prev = f64::INFINITY;
    for k in 2..=6 {
        let lost: Vec<usize> = (5..5 + k).collect();
        let (_, output) = run_pattern(TONE_HZ, 12, &lost);
        let frame_k = &output[(4 + k) * FRAME_LEN..(5 + k) * FRAME_LEN];
        let e = energy(frame_k);
        assert!(
            e < prev,
            "burst frame {k} energy {e} did not drop below {prev}"
        );
        prev = e;
    }
}

#[test]
fn test_synthetic_spectrum_keeps_pitch() {
    use rustfft::{num_complex::Complex, FftPlanner};

    // Four frames of synthesis from an 85 Hz tone should still be
    // dominated by a component near 85 Hz.
    let lost = [5usize, 6, 7, 8];
    let (_, output) = run_pattern(TONE_HZ, 9, &lost);
    let synthetic = &output[5 * FRAME_LEN..9 * FRAME_LEN];

    const FFT_LEN: usize = 4096;
    let mut buffer: Vec<Complex<f32>> = synthetic
        .iter()
        .map(|&s| Complex::new(s as f32, 0.0))
        .collect();
    buffer.resize(FFT_LEN, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(FFT_LEN).process(&mut buffer);

    let peak_bin = (1..FFT_LEN / 2)
        .max_by(|&a, &b| {
            buffer[a]
                .norm_sqr()
                .partial_cmp(&buffer[b].norm_sqr())
                .unwrap()
        })
        .unwrap();
    let peak_hz = peak_bin as f64 * SAMPLE_RATE / FFT_LEN as f64;

    assert!(
        (70.0..=100.0).contains(&peak_hz),
        "synthetic spectrum peaked at {peak_hz:.1} Hz"
    );
}
