//! Line-oriented PCM text files: one decimal 16-bit sample per line.
//!
//! The format the command-line codec tools exchange with recording and
//! plotting scripts. Parsing is strict; any non-numeric line is an error.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::Error;

/// Read a whole PCM text file into memory.
pub fn read_pcm_text(path: impl AsRef<Path>) -> Result<Vec<i16>, Error> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let sample = text.parse::<i16>().map_err(|_| Error::InvalidSample {
            line: idx + 1,
            text: text.to_string(),
        })?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Write samples as a PCM text file, one decimal per line.
pub fn write_pcm_text(path: impl AsRef<Path>, samples: &[i16]) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    for &s in samples {
        writeln!(writer, "{s}")?;
    }
    writer.flush()?;
    Ok(())
}
