use gifcraft::{
    DecodeError,
    bits::{BitField, BitSpec},
    blocks::read_sub_blocks,
    cursor::ByteCursor,
    gif::decode_with_extent,
};
use proptest::prelude::*;

const MINIMAL: &[u8] = &[
    b'G', b'I', b'F', b'8', b'9', b'a', 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x02, 0x02, 0x44,
    0x01, 0x00, 0x3B,
];

/// Length of header plus logical screen descriptor.
const PREAMBLE: usize = 13;

fn bit_spec() -> impl Strategy<Value = BitSpec> {
    (0u8..8).prop_flat_map(|index| {
        (Just(index), 1u8..=8 - index).prop_map(|(i, l)| BitSpec::new(i, l))
    })
}

fn chunk() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=255)
}

proptest! {
    #[test]
    fn bit_field_matches_shift_and_mask(byte in any::<u8>(), spec in bit_spec()) {
        let field = BitField::try_from(&spec).unwrap();
        let mask = (1u16 << spec.length) - 1;
        let expected = (byte >> (8 - spec.index - spec.length)) as u16 & mask;
        prop_assert_eq!(field.extract(byte) as u16, expected);
    }

    #[test]
    fn bit_field_rejects_ranges_past_the_byte(index in 0u8..16, length in 0u8..16) {
        prop_assume!(length == 0 || index + length > 8);
        prop_assert!(BitField::try_from(&BitSpec::new(index, length)).is_err());
    }

    #[test]
    fn sub_blocks_concatenate(chunks in prop::collection::vec(chunk(), 0..8)) {
        let mut data = Vec::new();
        for chunk in &chunks {
            data.push(chunk.len() as u8);
            data.extend_from_slice(chunk);
        }
        data.push(0);

        let mut cursor = ByteCursor::new(&data);
        let out = read_sub_blocks(&mut cursor).unwrap();

        prop_assert_eq!(out, chunks.concat());
        prop_assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn truncated_gif_never_decodes(cut in 0..MINIMAL.len() - 1) {
        // Cutting right after the screen descriptor leaves a valid, frameless stream.
        prop_assume!(cut != PREAMBLE);
        prop_assert!(matches!(
            decode_with_extent(&MINIMAL[..cut]),
            Err(DecodeError::EndOfStream { .. })
        ), "truncated stream did not fail with EndOfStream");
    }

    #[test]
    fn trailing_bytes_are_not_consumed(tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut data = MINIMAL.to_vec();
        data.extend_from_slice(&tail);

        let (consumed, _) = decode_with_extent(&data).unwrap();
        prop_assert_eq!(consumed, MINIMAL.len() - 1);
    }
}
