// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property tests for mask sizing and binary decoding.

use bumpalo::Bump;
use proptest::prelude::*;
use sns_core::mask::{word_count, KNOWN_BITS};
use sns_core::{data_size, pack, unpack, Reader, SprBase, Writer, ATTRIBUTE_TABLE};

proptest! {
    #[test]
    fn size_is_aligned_sum_of_present_widths(mask in any::<u32>()) {
        let expected: usize = ATTRIBUTE_TABLE
            .iter()
            .filter(|attr| mask & attr.kind.bit() != 0)
            .map(|attr| attr.words * 4)
            .sum();
        prop_assert_eq!(data_size(mask) % 4, 0);
        prop_assert_eq!(data_size(mask), expected);
        prop_assert_eq!(data_size(mask), data_size(mask & KNOWN_BITS));
    }

    #[test]
    fn pack_unpack_preserves_words(
        mask in 0u32..=KNOWN_BITS,
        seed in prop::collection::vec(any::<u32>(), 19),
    ) {
        let data = &seed[..word_count(mask)];
        let mut w = Writer::default();
        pack(mask, data, &mut w);
        let bytes = w.into_vec();
        prop_assert_eq!(bytes.len(), 4 + data_size(mask));

        let mut r = Reader::new(&bytes);
        prop_assert_eq!(r.read_u32_le().unwrap(), mask);
        prop_assert_eq!(unpack(mask, &mut r).unwrap(), data.to_vec());
        prop_assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn garbage_input_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let arena = Bump::new();
        let _ = SprBase::load_from_bin(&arena, &mut Reader::new(&bytes));
    }

    #[test]
    fn binary_records_restore_verbatim(
        mask in 0u32..=KNOWN_BITS,
        seed in prop::collection::vec(any::<u32>(), 19),
        name in "[a-z]{0,12}",
    ) {
        let mut w = Writer::default();
        w.write_str(None).unwrap();
        w.write_str(Some(&name)).unwrap();
        pack(mask, &seed[..word_count(mask)], &mut w);
        let bytes = w.into_vec();

        let arena = Bump::new();
        let spr = SprBase::load_from_bin(&arena, &mut Reader::new(&bytes)).unwrap();
        prop_assert_eq!(spr.mask(), mask);
        prop_assert_eq!(spr.bin_size(), bytes.len());

        let mut out = Writer::default();
        spr.store_to_bin(&mut out).unwrap();
        prop_assert_eq!(out.into_vec(), bytes);
    }
}
