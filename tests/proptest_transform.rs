use stagecoord::transform::{
    parse_coefficients, to_stage, AffineDescriptor, ParseError, LINEAR_SCALE, OFFSET_SCALE,
};
use proptest::prelude::*;

mod proptest_helpers;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn rendered_sequences_parse_back(raw in proptest_helpers::arb_raw_descriptor()) {
        let text = proptest_helpers::render_sequence(&raw);
        let parsed = parse_coefficients(&text).expect("parse rendered sequence");
        prop_assert_eq!(parsed, raw);
    }

    #[test]
    fn origin_maps_to_scaled_offset(raw in proptest_helpers::arb_raw_descriptor()) {
        let descriptor = AffineDescriptor::from_raw(raw);
        let stage = to_stage(&descriptor, 0, 0);

        prop_assert!(close(stage.x, raw[4] * OFFSET_SCALE));
        prop_assert!(close(stage.y, raw[5] * OFFSET_SCALE));
    }

    #[test]
    fn scaling_round_trips(raw in proptest_helpers::arb_raw_descriptor()) {
        let restored = AffineDescriptor::from_raw(raw).to_raw();
        for (a, b) in restored.iter().zip(raw.iter()) {
            prop_assert!(close(*a, *b), "{} != {}", a, b);
        }
    }

    #[test]
    fn transform_matches_formula(
        raw in proptest_helpers::arb_raw_descriptor(),
        (x, y) in proptest_helpers::arb_pixel(),
    ) {
        let stage = to_stage(&AffineDescriptor::from_raw(raw), x, y);
        let (xf, yf) = (x as f64, y as f64);
        let expected_x = raw[0] * LINEAR_SCALE * xf + raw[1] * LINEAR_SCALE * yf + raw[4] * OFFSET_SCALE;
        let expected_y = raw[2] * LINEAR_SCALE * xf + raw[3] * LINEAR_SCALE * yf + raw[5] * OFFSET_SCALE;

        prop_assert!(close(stage.x, expected_x));
        prop_assert!(close(stage.y, expected_y));
    }

    #[test]
    fn wrong_length_is_rejected(
        values in prop::collection::vec(proptest_helpers::arb_coefficient(), 0..12)
            .prop_filter("not six elements", |v| v.len() != 6),
    ) {
        let text = proptest_helpers::render_sequence(&values);
        prop_assert_eq!(
            parse_coefficients(&text),
            Err(ParseError::WrongLength { found: values.len() })
        );
    }

    #[test]
    fn non_numeric_token_is_rejected(
        raw in proptest_helpers::arb_raw_descriptor(),
        position in 0usize..6,
        token in "[a-zA-Z_][a-zA-Z0-9_()]{0,10}",
    ) {
        let mut items: Vec<String> = raw.iter().map(|v| format!("{:?}", v)).collect();
        items[position] = token.clone();
        let text = format!("[{}]", items.join(", "));

        prop_assert_eq!(
            parse_coefficients(&text),
            Err(ParseError::NonNumeric { index: position, token })
        );
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".{0,64}") {
        let _ = parse_coefficients(&text);
    }
}
