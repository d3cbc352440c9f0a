//! ITU-T G.711 Appendix I packet loss concealment for 8 kHz telephone audio.
//!
//! Conceal lost 10 ms frames of 16-bit linear PCM inside a voice pipeline:
//! call [`Plc::good_frame`] for every frame that arrived and
//! [`Plc::bad_frame`] for every frame that did not, in strict stream order.
//! Lost frames are replaced by pitch-periodic synthetic audio extrapolated
//! from recent history, attenuated as a loss burst lengthens, and
//! cross-faded back into the real signal when frames resume. Output trails
//! input by 30 samples (3.75 ms); that deferral is what makes the
//! resumption cross-fade possible.
//!
//! The companion [`ulaw`] module provides the stateless G.711 µ-law
//! byte↔sample codec used on the wire.
//!
//! # Example
//!
//! ```
//! use g711_plc::Plc;
//!
//! let mut plc = Plc::new();
//! let input = [0i16; 80];
//! let mut output = [0i16; 80];
//!
//! plc.good_frame(&input, &mut output); // frame arrived
//! plc.bad_frame(&mut output);          // frame lost: synthetic audio
//! plc.good_frame(&input, &mut output); // resumed: cross-fade back in
//! ```

pub mod params;
pub mod plc;
pub mod textpcm;
pub mod ulaw;

pub use plc::Plc;
pub use ulaw::{decode_ulaw, encode_ulaw};

/// Errors returned by the file-format helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid PCM sample {text:?}")]
    InvalidSample { line: usize, text: String },
}
