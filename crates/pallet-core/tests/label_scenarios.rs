//! End-to-end extraction behaviour on representative label texts.

use std::sync::Arc;
use std::thread;

use pallet_core::label::rules::UNIT_TOKENS;
use pallet_core::{Confidence, ExtractionResult, LabelField, LabelParser, LayeredLabelParser};
use pretty_assertions::assert_eq;

const SAMPLES: [&str; 10] = [
    "ITEM NUMBER: BRI023A250SM200BMHP\nBATCH NO: 284019\nQUANTITY: 1200\nDATE: 14/03/2025",
    "BRIX & CO ALBA RASPBERRY 5.9% 250ML\n284019\n1200\n14/03/2025",
    "6SCC(00)000000000000222051",
    "",
    "QUANTITY: EA",
    "DATE: 14:30",
    "RECORP LTD\nITEM NUMBER EA\nITEM DESCRIPTION N/A\n'284019'\n14/03/2025 06:30\n06:30\n29",
    "ssCC: 1234 5678 9012 3456 7890 1234",
    "Customer Item Number: 55-1020\nEAN Number: 5060123456789\nTIME: 07:15:30",
    "   \n\t\n",
];

fn parse(text: &str) -> ExtractionResult {
    LayeredLabelParser::new().parse(text)
}

fn assert_field(result: &ExtractionResult, field: LabelField, value: &str, level: Confidence) {
    assert_eq!(result.parsed.get(field), value, "value of {field}");
    assert_eq!(result.confidence_of(field), level, "confidence of {field}");
}

#[test]
fn labelled_ticket_is_high_confidence() {
    let result = parse(SAMPLES[0]);

    assert_field(&result, LabelField::ItemNumber, "BRI023A250SM200BMHP", Confidence::High);
    assert_field(&result, LabelField::BatchNo, "284019", Confidence::High);
    assert_field(&result, LabelField::Quantity, "1200", Confidence::High);
    assert_field(&result, LabelField::Date, "14/03/2025", Confidence::High);
}

#[test]
fn headless_ticket_uses_content_heuristics() {
    let result = parse(SAMPLES[1]);

    assert_field(
        &result,
        LabelField::ItemDescription,
        "BRIX & CO ALBA RASPBERRY 5.9% 250ML",
        Confidence::Medium,
    );
    assert_field(&result, LabelField::BatchNo, "284019", Confidence::Medium);
    assert_field(&result, LabelField::Quantity, "1200", Confidence::Medium);
    assert_field(&result, LabelField::Date, "14/03/2025", Confidence::Medium);
}

#[test]
fn misread_sscc_prefix_is_dropped() {
    let result = parse(SAMPLES[2]);
    assert_field(&result, LabelField::Sscc, "000000000000222051", Confidence::High);
}

#[test]
fn empty_text_resolves_nothing() {
    for text in [SAMPLES[3], SAMPLES[9]] {
        let result = parse(text);

        for field in LabelField::ALL {
            assert_field(&result, field, "", Confidence::Low);
        }
        assert_eq!(result.warnings.len(), 10);
    }
}

#[test]
fn unit_token_is_not_a_quantity() {
    let result = parse(SAMPLES[4]);
    assert_field(&result, LabelField::Quantity, "", Confidence::Low);
    assert!(result.warnings.contains(&"'quantity' not found".to_string()));
}

#[test]
fn time_under_date_heading_is_rejected() {
    let result = parse(SAMPLES[5]);
    assert_field(&result, LabelField::Date, "", Confidence::Low);
}

#[test]
fn noisy_ticket() {
    let result = parse(SAMPLES[6]);

    assert_field(&result, LabelField::ItemNumber, "", Confidence::Low);
    assert_field(&result, LabelField::ItemDescription, "ITEM NUMBER EA", Confidence::Low);
    assert_field(&result, LabelField::BatchNo, "284019", Confidence::Medium);
    // While the date is unset the date rule claims every remaining line, so
    // neither the mixed line nor the bare time fills anything.
    assert_field(&result, LabelField::Date, "", Confidence::Low);
    assert_field(&result, LabelField::Time, "", Confidence::Low);
}

#[test]
fn overlong_sscc_digits_fall_back_to_raw() {
    let result = parse(SAMPLES[7]);
    assert_field(&result, LabelField::Sscc, "1234 5678 9012 3456 7890 1234", Confidence::Medium);
}

#[test]
fn mixed_case_headings() {
    let result = parse(SAMPLES[8]);

    assert_field(&result, LabelField::CustomerItemNumber, "55-1020", Confidence::High);
    assert_field(&result, LabelField::EanNumber, "5060123456789", Confidence::High);
    assert_field(&result, LabelField::Time, "07:15", Confidence::High);
}

#[test]
fn parse_is_idempotent() {
    let parser = LayeredLabelParser::new();
    for text in SAMPLES {
        assert_eq!(parser.parse(text), parser.parse(text));
    }
}

#[test]
fn every_field_is_always_reported() {
    for text in SAMPLES {
        let result = parse(text);
        assert_eq!(result.confidence.len(), LabelField::ALL.len());

        let json = serde_json::to_value(&result).unwrap();
        let parsed = json["parsed"].as_object().unwrap();
        let confidence = json["confidence"].as_object().unwrap();
        assert_eq!(parsed.len(), 10);
        for field in LabelField::ALL {
            assert!(parsed.contains_key(field.as_str()));
            let level = confidence[field.as_str()].as_str().unwrap();
            assert!(["high", "medium", "low"].contains(&level));
        }
    }
}

#[test]
fn empty_values_are_low_confidence() {
    for text in SAMPLES {
        let result = parse(text);
        for (field, value) in result.parsed.iter() {
            if value.is_empty() {
                assert_eq!(result.confidence_of(field), Confidence::Low, "{field} in {text:?}");
            }
        }
    }
}

#[test]
fn sscc_is_digits_unless_degraded() {
    for text in SAMPLES {
        let result = parse(text);
        let sscc = &result.parsed.sscc;
        let digits_only = sscc.chars().all(|c| c.is_ascii_digit());
        if !sscc.is_empty() && digits_only {
            assert!((16..=22).contains(&sscc.len()), "{sscc}");
        }
        assert!(!sscc.contains("SCC"));
    }
}

#[test]
fn date_and_time_never_swap() {
    for text in SAMPLES {
        let result = parse(text);
        assert!(!result.parsed.date.contains(':'));
        assert!(!result.parsed.time.contains('/'));
    }
}

#[test]
fn item_number_never_a_unit() {
    for text in SAMPLES.iter().chain(["ITEM NUMBER: ea", "Item Number: BOX\nBAG"].iter()) {
        let result = parse(text);
        let item = result.parsed.item_number.to_uppercase();
        assert!(!UNIT_TOKENS.contains(&item.as_str()));
    }
}

#[test]
fn structured_values_are_final() {
    // The heading line would give a different batch, the bare line a
    // different quantity; neither may override the structured pass.
    let text = "BATCH NO 111111\nBATCH NO: 222222\nQUANTITY 50\n3000";
    let result = parse(text);
    assert_field(&result, LabelField::BatchNo, "111111", Confidence::High);
    assert_field(&result, LabelField::Quantity, "50", Confidence::High);
}

#[test]
fn warnings_reflect_structured_pass_only() {
    let result = parse(SAMPLES[1]);
    assert!(result.parsed.is_set(LabelField::BatchNo));
    assert!(result.warnings.contains(&"'batch_no' not found".to_string()));
}

#[test]
fn concurrent_callers_share_one_parser() {
    let parser = Arc::new(LayeredLabelParser::new());
    let expected: Vec<ExtractionResult> = SAMPLES.iter().map(|t| parser.parse(t)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || SAMPLES.iter().map(|t| parser.parse(t)).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
