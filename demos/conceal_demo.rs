//! Concealment demo: run the PLC over a test tone with a fixed loss
//! pattern and write the clean and concealed signals as WAV files.
//!
//! Usage: conceal-demo [output-dir]

use std::env;
use std::f64::consts::PI;
use std::path::PathBuf;

use g711_plc::params::{FRAME_LEN, SAMPLE_RATE};
use g711_plc::Plc;

const FRAME_COUNT: usize = 12;
const TONE_HZ: f64 = 85.0;

/// Frames dropped on the simulated channel: one short burst and one long
/// enough to show the attenuation ramp.
fn is_lost(frame: usize) -> bool {
    frame == 4 || frame == 5 || (8..=11).contains(&frame)
}

fn write_wav(path: &PathBuf, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn rms(samples: &[i16]) -> f64 {
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

fn main() {
    let out_dir: PathBuf = env::args()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(env::temp_dir);

    let mut plc = Plc::new();
    let omega = 2.0 * PI * TONE_HZ / SAMPLE_RATE;
    let mut phase: f64 = 0.0;

    let mut clean = Vec::new();
    let mut concealed = Vec::new();

    eprintln!("{:>5} {:>6} {:>10} {:>10}", "frame", "state", "in RMS", "out RMS");
    for j in 0..FRAME_COUNT {
        let mut input = [0i16; FRAME_LEN];
        for s in input.iter_mut() {
            *s = (0.5 * 32767.0 * phase.cos()) as i16;
            phase += omega;
        }

        let mut output = [0i16; FRAME_LEN];
        if is_lost(j) {
            plc.bad_frame(&mut output);
        } else {
            plc.good_frame(&input, &mut output);
        }

        eprintln!(
            "{j:>5} {:>6} {:>10.1} {:>10.1}",
            if is_lost(j) { "lost" } else { "ok" },
            rms(&input),
            rms(&output),
        );

        clean.extend_from_slice(&input);
        concealed.extend_from_slice(&output);
    }

    let clean_path = out_dir.join("conceal_demo_clean.wav");
    let concealed_path = out_dir.join("conceal_demo_concealed.wav");
    write_wav(&clean_path, &clean);
    write_wav(&concealed_path, &concealed);

    eprintln!("Wrote {}", clean_path.display());
    eprintln!("Wrote {}", concealed_path.display());
}
