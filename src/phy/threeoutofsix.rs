//! 3-of-6 line code.
//!
//! Each 4-bit nibble is transmitted as a 6-bit codeword with exactly three
//! set bits, giving DC balance and basic error detection. [`LineDecoder`]
//! consumes the demodulated bit stream, carrying partial codewords and an
//! unpaired codeword across chunk boundaries.

use tracing::trace;

use crate::{Error, Result};

/// Codeword to nibble decode table.
const CODEWORDS: [(u8, u8); 16] = [
    (22, 0x0),
    (13, 0x1),
    (14, 0x2),
    (11, 0x3),
    (28, 0x4),
    (25, 0x5),
    (26, 0x6),
    (19, 0x7),
    (44, 0x8),
    (37, 0x9),
    (38, 0xa),
    (35, 0xb),
    (52, 0xc),
    (49, 0xd),
    (50, 0xe),
    (41, 0xf),
];

/// Decode a 6-bit codeword to its nibble, or `None` if the codeword is not
/// part of the code.
#[must_use]
pub fn decode_codeword(codeword: u8) -> Option<u8> {
    CODEWORDS
        .iter()
        .find(|&&(cw, _)| cw == codeword)
        .map(|&(_, nibble)| nibble)
}

/// Encode a nibble as its 6-bit codeword, or `None` if `nibble` is greater
/// than 15.
#[must_use]
pub fn encode_nibble(nibble: u8) -> Option<u8> {
    CODEWORDS
        .iter()
        .find(|&&(_, n)| n == nibble)
        .map(|&(cw, _)| cw)
}

/// Stateful decoder for a bit stream that arrives in arbitrarily sized
/// chunks.
///
/// Bits that do not fill a 6-bit group and a codeword without a partner
/// for byte packing are held until the next call.
#[derive(Debug, Default)]
pub(crate) struct LineDecoder {
    spilled_bits: Vec<u8>,
    spilled_codeword: Option<u8>,
    lenient: bool,
}

impl LineDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pass unknown codewords through as their low 4 bits instead of
    /// failing.
    pub(crate) fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    /// Decode `bits` (one 0/1 value per symbol) into bytes.
    ///
    /// On [`Error::InvalidLineCode`] the carry state is unspecified, and
    /// nothing clears it; decode further data with a fresh decoder.
    pub(crate) fn decode(&mut self, bits: &[u8]) -> Result<Vec<u8>> {
        let mut stream = Vec::with_capacity(self.spilled_bits.len() + bits.len());
        stream.append(&mut self.spilled_bits);
        stream.extend_from_slice(bits);
        let keep = stream.len() - stream.len() % 6;
        self.spilled_bits = stream.split_off(keep);

        let mut codewords = Vec::with_capacity(stream.len() / 6 + 1);
        if let Some(cw) = self.spilled_codeword.take() {
            codewords.push(cw);
        }
        for group in stream.chunks_exact(6) {
            codewords.push(group.iter().fold(0, |cw, &bit| (cw << 1) | bit));
        }
        if codewords.len() % 2 != 0 {
            self.spilled_codeword = codewords.pop();
        }

        let mut out = Vec::with_capacity(codewords.len() / 2);
        for pair in codewords.chunks_exact(2) {
            let hi = self.translate(pair[0])?;
            let lo = self.translate(pair[1])?;
            out.push((hi << 4) | lo);
        }
        trace!(
            decoded = out.len(),
            spilled_bits = self.spilled_bits.len(),
            spilled_codeword = self.spilled_codeword.is_some(),
            "line decode"
        );
        Ok(out)
    }

    fn translate(&self, codeword: u8) -> Result<u8> {
        match decode_codeword(codeword) {
            Some(nibble) => Ok(nibble),
            None if self.lenient => Ok(codeword & 0xf),
            None => Err(Error::InvalidLineCode { codeword }),
        }
    }
}
