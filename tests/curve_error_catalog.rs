use std::collections::HashSet;

use launch_curve_core::amm::error::CurveError;
use launch_curve_core::amm::error_catalog::{default_locale_message, CurveErrorCode};
use launch_curve_core::amm::errors::{disposition, Disposition};

#[test]
fn all_codes_are_unique() {
    let mut seen = HashSet::new();
    for code in CurveErrorCode::all() {
        assert!(seen.insert(code.code()));
    }
    assert_eq!(seen.len(), CurveErrorCode::all().len());
}

#[test]
fn all_messages_nonempty() {
    for code in CurveErrorCode::all() {
        assert!(
            !code.message_pt().trim().is_empty(),
            "{} message should not be empty",
            code.code()
        );
        assert!(!code.title().trim().is_empty());
    }
}

#[test]
fn exhaustive_all_slice() {
    assert_eq!(CurveErrorCode::all().len(), 6);
    for (i, code) in CurveErrorCode::all().iter().enumerate() {
        assert_eq!(code.code(), format!("CRV-{:04}", i + 1));
    }
}

#[test]
fn every_code_has_a_disposition() {
    let fix: Vec<_> = CurveErrorCode::all()
        .iter()
        .filter(|c| disposition(**c) == Disposition::FixInput)
        .collect();
    assert_eq!(fix, [&CurveErrorCode::ZeroAmount, &CurveErrorCode::InvalidNumber]);
}

#[test]
fn format_examples_resolve_placeholders() {
    let err = CurveError::new(CurveErrorCode::InvalidNumber).with_context("input", "1.2.3");
    let user = err.to_user_string();
    assert!(user.contains("CRV-0006"));
    assert!(user.ends_with("1.2.3"));
    let json = err.to_log_json();
    assert!(json.contains("\"context\":{\"input\":\"1.2.3\"}"));
    assert_eq!(
        default_locale_message(CurveErrorCode::ZeroAmount),
        "amount deve ser > 0"
    );
}
