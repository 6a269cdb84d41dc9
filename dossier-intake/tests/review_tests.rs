//! Needs-review decision tests across the field policy table

use dossier_common::ReviewSettings;
use dossier_intake::review::{FieldPolicy, FunctionRow, ReconciliationMode, ReviewEngine};
use dossier_intake::{calc_needs_review, FieldObservation, Observed};
use dossier_intake::Observed::{Absent, Present};

#[test]
fn test_standard_manual_differs_from_document() {
    assert!(calc_needs_review(Present(true), Present(false), Present(true), true, "technisch_vorhanden"));
}

#[test]
fn test_standard_document_agrees_with_ai() {
    assert!(!calc_needs_review(Absent, Present(true), Present(true), false, "technisch_vorhanden"));
}

#[test]
fn test_standard_nothing_authoritative() {
    assert!(calc_needs_review(Absent, Absent, Absent, false, "ki_beteiligung"));
}

#[test]
fn test_manual_only_document_absent_never_reviews() {
    assert!(!calc_needs_review(Present(true), Absent, Absent, true, "zur_lv_kontrolle"));
    // Same inputs on a STANDARD field do need review
    assert!(calc_needs_review(Present(true), Absent, Absent, true, "technisch_vorhanden"));
}

#[test]
fn test_configured_policy_replaces_defaults() {
    let settings = ReviewSettings {
        manual_only_fields: vec!["ki_beteiligung".to_string()],
    };
    let engine = ReviewEngine::from_settings(&settings);
    let obs = FieldObservation::new(Present(true), Absent, Present(false), true);

    assert!(!engine.needs_review("ki_beteiligung", &obs));
    // No longer MANUAL_ONLY under this configuration
    assert!(engine.needs_review("zur_lv_kontrolle", &obs));
}

#[test]
fn test_engine_matches_free_function_with_defaults() {
    let engine = ReviewEngine::from_settings(&ReviewSettings::default());
    let values = [Absent, Present(false), Present(true)];
    for field in ["technisch_vorhanden", "einsatz_bei_telefonica", "unknown"] {
        for manual in values {
            for doc in values {
                for ai in values {
                    for has_manual in [false, true] {
                        let obs = FieldObservation::new(manual, doc, ai, has_manual);
                        assert_eq!(
                            engine.needs_review(field, &obs),
                            calc_needs_review(manual, doc, ai, has_manual, field)
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_policy_lookup_for_custom_table() {
    let policy = FieldPolicy::new().with_mode("a", ReconciliationMode::ManualOnly);
    let engine = ReviewEngine::new(policy);
    assert_eq!(engine.policy().mode_for("a"), ReconciliationMode::ManualOnly);
    assert_eq!(engine.policy().mode_for("b"), ReconciliationMode::Standard);
}

#[test]
fn test_rows_from_json() {
    let rows: Vec<FunctionRow> = serde_json::from_str(
        r#"[
            {"function": "Audit log", "fields": {
                "technisch_vorhanden": {"manual": true, "document": null, "has_manual": true}
            }},
            {"function": "Reporting"}
        ]"#,
    )
    .unwrap();

    let summary = ReviewEngine::default().review_rows(&rows);
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows_needing_review, 1);
    assert!(summary.rows[0].flags["technisch_vorhanden"]);
    assert!(summary.rows[1].flags.is_empty());
}

#[test]
fn test_default_engine_uses_compiled_field_table() {
    let engine = ReviewEngine::default();
    let obs = FieldObservation::new(Present(true), Absent, Absent, true);
    for field in ["einsatz_bei_telefonica", "zur_lv_kontrolle"] {
        assert_eq!(engine.policy().mode_for(field), ReconciliationMode::ManualOnly);
        assert!(!engine.needs_review(field, &obs));
        assert_eq!(
            engine.needs_review(field, &obs),
            calc_needs_review(Present(true), Absent, Absent, true, field)
        );
    }
    // Same observation on a STANDARD field still needs review
    assert!(engine.needs_review("technisch_vorhanden", &obs));
}
