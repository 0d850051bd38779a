use oacare_core::models::assessment::Indicators;
use oacare_scoring::screening::{
    Answers, NEGATIVE_RESULT, POSITIVE_RESULT, coerce_flag, counts_toward_reports, score,
};
use serde_json::json;

#[test]
fn every_indicator_vector_scores_by_the_two_of_five_rule() {
    for bits in 0u8..32 {
        let answers: [bool; 5] = std::array::from_fn(|i| ((bits >> i) & 1) == 1);
        let screening = score(&Indicators::from_array(answers));

        let expected = bits.count_ones() as u8;
        assert_eq!(screening.yes_count, expected, "vector {bits:05b}");
        if expected >= 2 {
            assert_eq!(screening.result_text, POSITIVE_RESULT, "vector {bits:05b}");
        } else {
            assert_eq!(screening.result_text, NEGATIVE_RESULT, "vector {bits:05b}");
        }
    }
}

#[test]
fn two_affirmatives_are_positive() {
    let indicators = Indicators::from_array([true, true, false, false, false]);
    let screening = score(&indicators);
    assert_eq!(screening.yes_count, 2);
    assert_eq!(screening.result_text, POSITIVE_RESULT);
}

#[test]
fn no_affirmatives_are_negative() {
    let screening = score(&Indicators::default());
    assert_eq!(screening.yes_count, 0);
    assert_eq!(screening.result_text, NEGATIVE_RESULT);
}

#[test]
fn truthy_encodings_coerce_to_true() {
    for value in [json!(true), json!(1), json!(1.0), json!("1"), json!("true"), json!("TRUE"), json!("yes"), json!(" Yes "), json!("ใช่")] {
        assert!(coerce_flag(&value), "{value} should be true");
    }
}

#[test]
fn everything_else_coerces_to_false() {
    for value in [json!(false), json!(0), json!(2), json!("0"), json!("no"), json!("ไม่ใช่"), json!(""), json!(null), json!([1]), json!({"yes": true})] {
        assert!(!coerce_flag(&value), "{value} should be false");
    }
}

#[test]
fn answers_deserialize_leniently() {
    let answers: Answers = serde_json::from_value(json!({
        "stiffness": 1,
        "crepitus": "yes",
        "bonyTenderness": "ใช่",
        "bonyEnlargement": "maybe",
    }))
    .unwrap();

    let indicators = Indicators::from(answers);
    assert_eq!(indicators.as_array(), [true, true, true, false, false]);
    assert_eq!(score(&indicators).yes_count, 3);
}

#[test]
fn reporting_rule_is_separate_from_screening_rule() {
    assert!(!counts_toward_reports(2, "follow-up recommended"));
    assert!(counts_toward_reports(3, "follow-up recommended"));
    assert!(counts_toward_reports(2, POSITIVE_RESULT));
    // the canonical negative wording also names the disease
    assert!(counts_toward_reports(0, NEGATIVE_RESULT));
}
