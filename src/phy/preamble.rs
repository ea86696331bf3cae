/// Preamble chip pattern in the ±1 form produced by a quadrature
/// demodulator; a 0 symbol demodulates to −1.
pub const PREAMBLE_BITS: [i8; 49] = [
    -1, // bit period before the alternating run settles
    -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1,
    -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1,
    -1, -1, -1, -1, 1, 1, 1, 1, -1, 1, // sync word
];

/// Expand a bit pattern to a sample template by repeating each entry
/// `oversampling` times.
pub(crate) fn oversample(bits: &[i8], oversampling: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(bits.len() * oversampling);
    for &bit in bits {
        out.extend(std::iter::repeat(f32::from(bit)).take(oversampling));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversample_repeats_each_bit() {
        let out = oversample(&[-1, 1], 4);
        assert_eq!(out, vec![-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn template_length() {
        assert_eq!(oversample(&PREAMBLE_BITS, 18).len(), 49 * 18);
    }

    #[test]
    fn pattern_shape() {
        // One lead-in chip, 19 alternating pairs, then the 00001111 run of
        // the sync word.
        assert_eq!(PREAMBLE_BITS[0], -1);
        assert_eq!(&PREAMBLE_BITS[1..5], &[-1, 1, -1, 1]);
        assert_eq!(&PREAMBLE_BITS[39..47], &[-1, -1, -1, -1, 1, 1, 1, 1]);
        assert_eq!(&PREAMBLE_BITS[47..], &[-1, 1]);
    }
}
