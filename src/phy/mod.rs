//! Streaming physical layer: preamble synchronization, symbol timing
//! recovery, 3-of-6 line decoding, and frame reassembly.

pub mod threeoutofsix;

mod correlate;
mod preamble;

pub use preamble::PREAMBLE_BITS;

use std::fmt::Display;

use tracing::{debug, trace};

use crate::telegram::Telegram;
use crate::Result;
use correlate::{correlate_full, peak_index};
use threeoutofsix::LineDecoder;

/// Samples per symbol used by [`Receiver::default`].
pub const DEFAULT_OVERSAMPLING: usize = 18;

/// Streaming Type A receiver.
///
/// Decodes one frame at a time from chunks of demodulated phase samples:
/// the first chunk is correlated against the oversampled preamble to find
/// the symbol sampling offset, every chunk is then sliced into bits at one
/// sample per symbol period, line-decoded, and appended to the frame until
/// the length derived from the first byte is reached. Feeding more samples
/// after a completed frame starts over with a fresh synchronization.
#[derive(Debug)]
pub struct Receiver {
    oversampling: usize,
    template: Vec<f32>,
    offset: Option<usize>,
    target_len: Option<usize>,
    frame_done: bool,
    frame: Vec<u8>,
    line: LineDecoder,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSAMPLING)
    }
}

impl Display for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Receiver{{offset={:?}, target_len={:?}, frame_len={}, done={}}}",
            self.offset,
            self.target_len,
            self.frame.len(),
            self.frame_done
        )
    }
}

impl Receiver {
    /// Create a receiver for a front end producing `oversampling` samples
    /// per symbol.
    ///
    /// # Panics
    /// Panics if `oversampling` is odd or less than 2; the timing recovery
    /// arithmetic works in half symbol periods.
    #[must_use]
    pub fn new(oversampling: usize) -> Self {
        assert!(
            oversampling >= 2 && oversampling % 2 == 0,
            "oversampling factor must be even and at least 2"
        );
        Receiver {
            oversampling,
            template: preamble::oversample(&PREAMBLE_BITS, oversampling),
            offset: None,
            target_len: None,
            frame_done: false,
            frame: Vec::new(),
            line: LineDecoder::new(),
        }
    }

    /// Pass unknown 3-of-6 codewords through as their low 4 bits instead
    /// of failing the feed. Off by default.
    #[must_use]
    pub fn with_lenient_line_code(mut self, lenient: bool) -> Self {
        self.line.set_lenient(lenient);
        self
    }

    /// Process one chunk of phase samples.
    ///
    /// Chunks must arrive whole and in temporal order but may have any
    /// length; the sampling offset is recomputed after every chunk so
    /// boundaries need not align with symbol periods. After each call
    /// check [`frame_complete`](Self::frame_complete) and read the bytes
    /// with [`current_frame`](Self::current_frame).
    ///
    /// The first feed after a completed frame resets the per-frame state
    /// before any samples are processed.
    ///
    /// # Errors
    /// [`Error::InvalidLineCode`](crate::Error::InvalidLineCode) if a
    /// 6-bit group is not a valid codeword and the receiver is not
    /// lenient. [`reset`](Self::reset) keeps the line decoder carry, so it
    /// does not recover from a corrupt stream; decode further data with a
    /// fresh `Receiver`.
    pub fn feed(&mut self, chunk: &[f32]) -> Result<()> {
        if self.frame_done {
            self.reset();
        }
        if chunk.is_empty() {
            return Ok(());
        }
        let offset = match self.offset {
            Some(offset) => offset,
            None => {
                let offset = self.synchronize(chunk);
                self.offset = Some(offset);
                offset
            }
        };

        let bits = sample_bits(chunk, offset, self.oversampling);
        let bytes = self.line.decode(&bits)?;

        if self.target_len.is_none() {
            if let Some(&length_field) = bytes.first() {
                let target = Telegram::raw_frame_len(length_field);
                debug!(length_field, target, "frame length determined");
                self.target_len = Some(target);
            }
        }

        self.offset = Some(next_offset(chunk.len(), offset, self.oversampling));
        self.frame.extend_from_slice(&bytes);
        if let Some(target) = self.target_len {
            if self.frame.len() >= target {
                self.frame.truncate(target);
                self.frame_done = true;
                debug!(frame_len = self.frame.len(), "frame complete");
            }
        }
        trace!(
            samples = chunk.len(),
            bits = bits.len(),
            bytes = bytes.len(),
            state = %self,
            "chunk processed"
        );
        Ok(())
    }

    /// True once a full frame has been assembled.
    #[must_use]
    pub fn frame_complete(&self) -> bool {
        self.frame_done
    }

    /// Bytes assembled so far; a whole frame once
    /// [`frame_complete`](Self::frame_complete) returns true.
    #[must_use]
    pub fn current_frame(&self) -> &[u8] {
        &self.frame
    }

    /// Drop the accumulated frame and synchronize again on the next feed.
    ///
    /// This is the same reset that runs implicitly on the first feed after
    /// a completed frame: the sampling offset, completion flag, and frame
    /// buffer are cleared; the learned frame length and the line decoder
    /// carry are not.
    pub fn reset(&mut self) {
        self.offset = None;
        self.frame_done = false;
        self.frame.clear();
    }

    fn synchronize(&self, chunk: &[f32]) -> usize {
        let corr = correlate_full(chunk, &self.template);
        let peak = peak_index(&corr);
        let offset = peak + self.oversampling / 2;
        debug!(peak, offset, "synchronized");
        offset
    }
}

/// One bit decision per symbol period starting at `offset`: positive
/// samples map to 1, everything else (zero, negatives, NaN) to 0.
fn sample_bits(chunk: &[f32], offset: usize, oversampling: usize) -> Vec<u8> {
    chunk
        .iter()
        .skip(offset)
        .step_by(oversampling)
        .map(|&s| u8::from(s > 0.0))
        .collect()
}

/// Sampling offset for the next chunk, keeping the sub-symbol phase
/// continuous across a boundary that need not align with the symbol
/// period.
fn next_offset(chunk_len: usize, offset: usize, oversampling: usize) -> usize {
    let os = oversampling as i64;
    let half = os / 2;
    let l = chunk_len as i64 - offset as i64 - half;
    let next = ceil_div(l, os) * os - l;
    (next + half).rem_euclid(os) as usize
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1).div_euclid(b)
}
