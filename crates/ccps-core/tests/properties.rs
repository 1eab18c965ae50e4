//! Property-based tests for the transform engine.
//!
//! - Round-trip law: decode(encode(T)) == T for every valid protocol
//! - Mirror is self-inverse
//! - Shift(a) then Shift(b) equals Shift(a + b)
//! - Every transform preserves length
//! - Wave(0) is the identity in both directions

use std::num::NonZeroUsize;

use ccps_core::{Alphabet, Direction, Engine, Protocol, Transform};
use proptest::prelude::*;

fn alphabet_text(max_len: usize) -> impl Strategy<Value = String> {
    let symbols = Alphabet::standard().symbols().to_vec();
    prop::collection::vec(prop::sample::select(symbols), 0..max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

fn indices(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..Alphabet::standard().len(), 0..max_len)
}

/// One valid instruction rendered in protocol syntax.
fn instruction() -> impl Strategy<Value = String> {
    prop_oneof![
        (-500i64..500).prop_map(|amount| format!("p{amount}")),
        (1usize..12).prop_map(|block| format!("m{block}")),
        (-40i64..40, 0u32..100).prop_map(|(whole, tenths)| format!("l{whole}.{tenths}")),
        (1u32..1000).prop_map(|digits| format!("l*{digits}")),
        (1u32..1000).prop_map(|digits| format!("l-*{digits}")),
        (-9i64..9).prop_map(|height| format!("w{height}")),
    ]
}

fn protocol_string() -> impl Strategy<Value = String> {
    prop::collection::vec(instruction(), 1..6).prop_map(|parts| parts.concat())
}

fn transform() -> impl Strategy<Value = Transform> {
    prop_oneof![
        any::<i64>().prop_map(Transform::Shift),
        (1usize..64).prop_map(|b| Transform::Mirror(NonZeroUsize::new(b).expect("non-zero"))),
        (-1.0e6f64..1.0e6).prop_map(Transform::Linear),
        any::<i64>().prop_map(Transform::Wave),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip_law(protocol in protocol_string(), text in alphabet_text(64)) {
        let engine = Engine::standard();
        let protocol = Protocol::parse(&protocol).expect("generated protocols parse");

        let encoded = engine.encode(&protocol, &text).expect("encode");
        let decoded = engine.decode(&protocol, &encoded).expect("decode");

        // PROPERTY: decoding undoes encoding
        prop_assert_eq!(&decoded, &text);
        prop_assert!(engine.verify(&protocol, &text).is_consistent());
    }

    #[test]
    fn prop_every_transform_inverts(transform in transform(), input in indices(96)) {
        let n = Alphabet::standard().len();
        let encoded = transform.apply(&input, n, Direction::Encode);
        let decoded = transform.apply(&encoded, n, Direction::Decode);
        prop_assert_eq!(decoded, input);
    }

    #[test]
    fn prop_length_preserved(transform in transform(), input in indices(96)) {
        let n = Alphabet::standard().len();
        for direction in [Direction::Encode, Direction::Decode] {
            let out = transform.apply(&input, n, direction);
            prop_assert_eq!(out.len(), input.len());
            prop_assert!(out.iter().all(|&index| index < n));
        }
    }

    #[test]
    fn prop_mirror_self_inverse(block in 1usize..40, input in indices(96)) {
        let n = Alphabet::standard().len();
        let mirror = Transform::Mirror(NonZeroUsize::new(block).expect("non-zero"));
        let twice = mirror.apply(&mirror.apply(&input, n, Direction::Encode), n, Direction::Encode);
        prop_assert_eq!(twice, input);
    }

    #[test]
    fn prop_shift_additive(a in -10_000i64..10_000, b in -10_000i64..10_000, input in indices(64)) {
        let n = Alphabet::standard().len();
        let stepwise = Transform::Shift(b)
            .apply(&Transform::Shift(a).apply(&input, n, Direction::Encode), n, Direction::Encode);
        let combined = Transform::Shift(a + b).apply(&input, n, Direction::Encode);
        prop_assert_eq!(stepwise, combined);
    }

    #[test]
    fn prop_wave_zero_identity(input in indices(64)) {
        let n = Alphabet::standard().len();
        prop_assert_eq!(Transform::Wave(0).apply(&input, n, Direction::Encode), input.clone());
        prop_assert_eq!(Transform::Wave(0).apply(&input, n, Direction::Decode), input);
    }

    #[test]
    fn prop_wave_offset_returns_to_zero_each_cycle(height in 1i64..20) {
        // after a whole number of cycles the running offset is back at 0, so
        // position 4H is shifted exactly like position 0
        let n = Alphabet::standard().len();
        let period = 4 * height as usize;
        let input = vec![0; period * 2 + 1];
        let out = Transform::Wave(height).apply(&input, n, Direction::Encode);
        prop_assert_eq!(out[0], 0);
        prop_assert_eq!(out[period], 0);
        prop_assert_eq!(out[2 * period], 0);
    }

    #[test]
    fn prop_display_reparses(protocol in protocol_string()) {
        let parsed = Protocol::parse(&protocol).expect("generated protocols parse");
        let reparsed = Protocol::parse(&parsed.to_string()).expect("display output parses");
        prop_assert_eq!(&parsed.to_string(), &protocol);
        prop_assert_eq!(reparsed, parsed);
    }
}
