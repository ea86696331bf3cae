//! Type A telegram framing.
//!
//! A Type A frame opens with a fixed 12 byte first block: length, control,
//! manufacturer, address, and a 2 byte CRC. The control information byte
//! follows as the first byte of the data area, which is segmented into
//! blocks of up to 16 data bytes, each trailed by its own 2 byte CRC.
//! CRC bytes are located and removed here, never validated.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Data bytes per block before its CRC.
const BLOCK_DATA_LEN: usize = 16;
/// CRC bytes trailing every block.
const BLOCK_CRC_LEN: usize = 2;

/// A wireless M-Bus Type A telegram.
///
/// Header fields are stored as decoded from the wire (little-endian where
/// multi-byte); `payload` holds the data-block bytes with every CRC
/// removed and the control information byte excluded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Telegram {
    /// Header length field.
    pub length: u8,
    /// Control field.
    pub control: u8,
    /// Manufacturer id.
    pub manufacturer: u16,
    /// Device address.
    pub address: [u8; 6],
    /// CRC of the first block, stored but not validated.
    pub header_crc: u16,
    /// Control information field.
    pub control_info: u8,
    /// Data-block bytes with all CRC bytes removed.
    pub payload: Vec<u8>,
}

impl Telegram {
    /// Minimum number of bytes [`decode`](Self::decode) needs: the 12 byte
    /// first block plus the control information byte.
    pub const MIN_LEN: usize = 13;

    /// Decode a telegram from a reassembled frame, CRC bytes still in
    /// place.
    ///
    /// Data blocks that extend past the end of `dat` contribute what is
    /// there; the payload of a short buffer is simply short.
    ///
    /// # Errors
    /// [`Error::TruncatedFrame`] if `dat` is shorter than
    /// [`MIN_LEN`](Self::MIN_LEN).
    ///
    /// # Example
    /// ```
    /// use wmbus::Telegram;
    ///
    /// let dat: &[u8] = &[
    ///     // first block: length, control, manufacturer, address, crc
    ///     0x0f, 0x44, 0xae, 0x0c, 0x78, 0x56, 0x34, 0x12, 0x01, 0x07, 0xaa, 0xbb,
    ///     // data block: control information, 5 data bytes, crc
    ///     0x7a, 0x01, 0x02, 0x03, 0x04, 0x05, 0xcc, 0xdd,
    /// ];
    /// let telegram = Telegram::decode(dat).unwrap();
    /// assert_eq!(telegram.length, 15);
    /// assert_eq!(telegram.control_info, 0x7a);
    /// assert_eq!(telegram.payload, &[0x01, 0x02, 0x03, 0x04, 0x05]);
    /// ```
    pub fn decode(dat: &[u8]) -> Result<Telegram> {
        if dat.len() < Self::MIN_LEN {
            return Err(Error::TruncatedFrame {
                actual: dat.len(),
                minimum: Self::MIN_LEN,
            });
        }
        let mut address = [0u8; 6];
        address.copy_from_slice(&dat[4..10]);
        let telegram = Telegram {
            length: dat[0],
            control: dat[1],
            manufacturer: u16::from_le_bytes([dat[2], dat[3]]),
            address,
            header_crc: u16::from_le_bytes([dat[10], dat[11]]),
            control_info: dat[12],
            payload: extract_payload(dat[0], &dat[12..]),
        };
        debug!(
            length_field = telegram.length,
            payload_len = telegram.payload.len(),
            "decoded telegram"
        );
        Ok(telegram)
    }

    /// Total on-air frame size in bytes for a header length field,
    /// counting every per-block CRC.
    ///
    /// This is the byte count a receiver must assemble before the frame is
    /// complete: the first block carries the declared length plus its own
    /// CRC, every further full data block adds 2 CRC bytes, and a partial
    /// final block adds 2 more.
    #[must_use]
    pub fn raw_frame_len(length_field: u8) -> usize {
        let len = i64::from(length_field) - 9;
        let mut bytes = i64::from(length_field) + 2;
        bytes += len.div_euclid(16) * 2;
        if len.rem_euclid(16) != 0 {
            bytes += 2;
        }
        bytes as usize
    }

    /// Serialize in the no-CRC export layout: length, control,
    /// manufacturer, address, control information, payload. The header CRC
    /// and all block CRCs are deliberately absent.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(11 + self.payload.len());
        out.push(self.length);
        out.push(self.control);
        out.extend_from_slice(&self.manufacturer.to_le_bytes());
        out.extend_from_slice(&self.address);
        out.push(self.control_info);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Write the no-CRC export (see [`to_bytes`](Self::to_bytes)) to
    /// `out`.
    ///
    /// # Errors
    /// [`Error::Io`] if the write fails.
    pub fn write_no_crc<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(&self.to_bytes())?;
        Ok(())
    }
}

/// Concatenate the data bytes of every block in `area` (the frame from the
/// control information byte on), skipping per-block CRCs and dropping the
/// leading control information byte. Slices are clamped to the buffer, so
/// missing trailing blocks shorten the result instead of failing.
fn extract_payload(length_field: u8, area: &[u8]) -> Vec<u8> {
    let len = i64::from(length_field) - 9;
    let num_blocks = len.div_euclid(16) + 1;
    let tail = len.rem_euclid(16) as usize;

    let mut out = Vec::new();
    for i in 0..num_blocks {
        let block = i as usize;
        let start = block * (BLOCK_DATA_LEN + BLOCK_CRC_LEN);
        let take = if i == num_blocks - 1 && tail != 0 {
            tail
        } else {
            BLOCK_DATA_LEN
        };
        out.extend_from_slice(clamped(area, start, take));
        if block == 0 {
            // drop the control information byte, keep at most the rest of
            // the first block
            out = clamped(&out, 1, BLOCK_DATA_LEN - 1).to_vec();
        }
    }
    out
}

/// `dat[start..start + len]` with both ends clamped to the buffer.
fn clamped(dat: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(dat.len());
    let end = (start + len).min(dat.len());
    &dat[start..end]
}
