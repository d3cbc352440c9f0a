//! Convert a PCM text recording (one decimal 16-bit sample per line) to
//! raw G.711 µ-law bytes.

use std::env;
use std::fs;
use std::process::ExitCode;

use g711_plc::{encode_ulaw, textpcm};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("usage: encode <pcm-text-in> <ulaw-bin-out>");
        return ExitCode::FAILURE;
    }

    let samples = match textpcm::read_pcm_text(&args[0]) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("error reading {}: {e}", args[0]);
            return ExitCode::FAILURE;
        }
    };

    // Full-range 16-bit samples shift down to the encoder's 14-bit domain.
    let bytes: Vec<u8> = samples.iter().map(|&s| encode_ulaw(s >> 2)).collect();

    if let Err(e) = fs::write(&args[1], &bytes) {
        eprintln!("error writing {}: {e}", args[1]);
        return ExitCode::FAILURE;
    }

    eprintln!("Writing to: {}", args[1]);
    eprintln!("Samples:    {}", samples.len());
    ExitCode::SUCCESS
}
