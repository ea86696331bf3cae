use rand::{rngs::StdRng, Rng, SeedableRng};

use wmbus::phy::{threeoutofsix, PREAMBLE_BITS};
use wmbus::{Receiver, Telegram};

/// A complete 29 byte Type A frame: length field 25, one full data block,
/// per-block CRC bytes in place (never validated).
fn fixture_frame() -> Vec<u8> {
    hex::decode("1944ae0c7856341201073c4d78101112131415161718191a1b1c1d1e1f").unwrap()
}

/// Oversampled ±1 signal for `frame`: preamble chips followed by the
/// 3-of-6 encoded frame bits.
fn chips(frame: &[u8], oversampling: usize) -> Vec<f32> {
    let mut out: Vec<f32> = Vec::new();
    for &bit in &PREAMBLE_BITS {
        out.extend(std::iter::repeat(f32::from(bit)).take(oversampling));
    }
    for &byte in frame {
        for nibble in [byte >> 4, byte & 0xf] {
            let codeword = threeoutofsix::encode_nibble(nibble).unwrap();
            for i in (0..6).rev() {
                let chip = if (codeword >> i) & 1 == 1 { 1.0 } else { -1.0 };
                out.extend(std::iter::repeat(chip).take(oversampling));
            }
        }
    }
    out
}

#[test]
fn decodes_whole_signal_in_one_feed() {
    let frame = fixture_frame();
    let signal = chips(&frame, 4);

    let mut rx = Receiver::new(4);
    rx.feed(&signal).unwrap();
    assert!(rx.frame_complete());
    assert_eq!(rx.current_frame(), frame.as_slice());

    let telegram = Telegram::decode(rx.current_frame()).unwrap();
    assert_eq!(telegram.length, 0x19);
    assert_eq!(telegram.control, 0x44);
    assert_eq!(telegram.manufacturer, 0x0cae);
    assert_eq!(telegram.address, [0x78, 0x56, 0x34, 0x12, 0x01, 0x07]);
    assert_eq!(telegram.control_info, 0x78);
    let expect: Vec<u8> = (0x10..=0x1e).collect();
    assert_eq!(telegram.payload, expect);
}

#[test]
fn decodes_across_uneven_chunks() {
    let frame = fixture_frame();
    let signal = chips(&frame, 4);

    // First chunk holds the whole preamble; none of the later boundaries
    // land on a symbol period, so every chunk exercises the offset
    // recomputation.
    let mut rx = Receiver::new(4);
    let (head, rest) = signal.split_at(900);
    rx.feed(head).unwrap();
    for chunk in rest.chunks(193) {
        rx.feed(chunk).unwrap();
    }
    assert!(rx.frame_complete());
    assert_eq!(rx.current_frame(), frame.as_slice());
}

#[test]
fn tolerates_additive_noise() {
    let frame = fixture_frame();
    let mut rng = StdRng::seed_from_u64(7);
    let signal: Vec<f32> = chips(&frame, 4)
        .into_iter()
        .map(|chip| chip + rng.gen_range(-0.4..0.4))
        .collect();

    let mut rx = Receiver::new(4);
    let (head, rest) = signal.split_at(1000);
    rx.feed(head).unwrap();
    for chunk in rest.chunks(251) {
        rx.feed(chunk).unwrap();
    }
    assert!(rx.frame_complete());
    assert_eq!(rx.current_frame(), frame.as_slice());
}

#[test]
fn decodes_consecutive_frames_with_resync() {
    let frame = fixture_frame();
    let signal = chips(&frame, 4);

    let mut rx = Receiver::new(4);
    for _ in 0..2 {
        rx.feed(&signal).unwrap();
        assert!(rx.frame_complete());
        assert_eq!(rx.current_frame(), frame.as_slice());
    }
}

#[test]
fn decodes_at_default_oversampling() {
    let frame = fixture_frame();
    let signal = chips(&frame, 18);

    let mut rx = Receiver::default();
    rx.feed(&signal).unwrap();
    assert!(rx.frame_complete());
    assert_eq!(rx.current_frame(), frame.as_slice());
}
