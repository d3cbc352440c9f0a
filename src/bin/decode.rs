//! Convert raw G.711 µ-law bytes back to a PCM text recording (one
//! decimal 16-bit sample per line).

use std::env;
use std::fs;
use std::process::ExitCode;

use g711_plc::{decode_ulaw, textpcm};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("usage: decode <ulaw-bin-in> <pcm-text-out>");
        return ExitCode::FAILURE;
    }

    let bytes = match fs::read(&args[0]) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error reading {}: {e}", args[0]);
            return ExitCode::FAILURE;
        }
    };

    // The decoder yields 14-bit samples; shift back up to full range.
    let samples: Vec<i16> = bytes.iter().map(|&b| decode_ulaw(b) << 2).collect();

    if let Err(e) = textpcm::write_pcm_text(&args[1], &samples) {
        eprintln!("error writing {}: {e}", args[1]);
        return ExitCode::FAILURE;
    }

    eprintln!("Samples: {}", samples.len());
    ExitCode::SUCCESS
}
