// ABOUTME: Integration tests for the profile reconciler
// ABOUTME: Partial updates, derived-metric recomputation, atomic rejection and recompute policies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use macro_tracker::errors::ErrorCode;
use macro_tracker::models::{ActivityLevel, Sex};
use macro_tracker::profile::{
    ColumnValue, ProfileChanges, ProfileColumn, ProfileReconciler, ProfileUpdate,
    ReconcileOutcome, RecomputePolicy, StoredProfile,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn changes_of(outcome: ReconcileOutcome) -> ProfileChanges {
    match outcome {
        ReconcileOutcome::Changes(changes) => changes,
        ReconcileOutcome::NoOp => panic!("expected changes, got NoOp"),
    }
}

fn full_update() -> ProfileUpdate {
    ProfileUpdate {
        date_of_birth: Some("1995-01-10".into()),
        sex: Some("male".into()),
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
        activity_level: Some("sedentary".into()),
        ..ProfileUpdate::default()
    }
}

#[test]
fn test_full_update_computes_every_metric() {
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&full_update(), None, today())
            .unwrap(),
    );

    // 30 years old on 2025-06-15
    let target = changes.real(ProfileColumn::DailyCalorieTarget).unwrap();
    assert!((target - 1978.5).abs() < 1e-9);

    let bmi = changes.real(ProfileColumn::Bmi).unwrap();
    assert!((bmi - 22.857_142_857).abs() < 1e-6);

    let body_fat = changes.real(ProfileColumn::BodyFatPct).unwrap();
    assert!((body_fat - (1.20 * bmi + 0.23 * 30.0 - 16.2)).abs() < 1e-9);

    assert_eq!(
        changes.get(ProfileColumn::DateOfBirth),
        Some(&ColumnValue::Date(NaiveDate::from_ymd_opt(1995, 1, 10).unwrap()))
    );
    assert_eq!(changes.len(), 8);
}

#[test]
fn test_weight_and_height_only_yield_bmi() {
    let update = ProfileUpdate {
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
        ..ProfileUpdate::default()
    };
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap(),
    );

    assert!(changes.contains(ProfileColumn::Bmi));
    assert!(!changes.contains(ProfileColumn::DailyCalorieTarget));
    assert!(!changes.contains(ProfileColumn::BodyFatPct));
    assert_eq!(changes.len(), 3);
}

#[test]
fn test_zero_height_skips_bmi_without_error() {
    let update = ProfileUpdate {
        height_cm: Some(0.0),
        weight_kg: Some(70.0),
        ..ProfileUpdate::default()
    };
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap(),
    );

    assert!(!changes.contains(ProfileColumn::Bmi));
    assert_eq!(changes.real(ProfileColumn::HeightCm), Some(0.0));
}

#[test]
fn test_invalid_calendar_date_aborts_update() {
    let update = ProfileUpdate {
        name: Some("Ana".into()),
        date_of_birth: Some("2000-02-30".into()),
        ..ProfileUpdate::default()
    };
    let err = ProfileReconciler::default()
        .reconcile(&update, None, today())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn test_non_iso_date_shapes_abort_update() {
    for raw in ["2000-1-5", "2000-01-5", " 2000-01-05 ", "2000/01/05", "20000105", ""] {
        let update = ProfileUpdate {
            name: Some("Ana".into()),
            date_of_birth: Some(raw.into()),
            ..ProfileUpdate::default()
        };
        let err = ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "{raw:?} was accepted");
    }
}

#[test]
fn test_zero_padded_date_of_birth_is_stored() {
    let update = ProfileUpdate {
        date_of_birth: Some("2000-01-05".into()),
        ..ProfileUpdate::default()
    };
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap(),
    );
    assert_eq!(
        changes.get(ProfileColumn::DateOfBirth),
        Some(&ColumnValue::Date(NaiveDate::from_ymd_opt(2000, 1, 5).unwrap()))
    );
}

#[test]
fn test_invalid_sex_or_activity_aborts_update() {
    let mut update = full_update();
    update.sex = Some("otro".into());
    let err = ProfileReconciler::default()
        .reconcile(&update, None, today())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let mut update = full_update();
    update.activity_level = Some("muy_muy_activo".into());
    let err = ProfileReconciler::default()
        .reconcile(&update, None, today())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn test_enum_values_stored_by_name() {
    let update = ProfileUpdate {
        sex: Some("female".into()),
        activity_level: Some("very_active".into()),
        ..ProfileUpdate::default()
    };
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap(),
    );
    assert_eq!(
        changes.get(ProfileColumn::Sex),
        Some(&ColumnValue::Text("female".into()))
    );
    assert_eq!(
        changes.get(ProfileColumn::ActivityLevel),
        Some(&ColumnValue::Text("very_active".into()))
    );
}

fn stored_profile() -> StoredProfile {
    StoredProfile {
        date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1),
        sex: Some(Sex::Female),
        height_cm: Some(160.0),
        weight_kg: Some(60.0),
        activity_level: Some(ActivityLevel::VeryActive),
        ..StoredProfile::default()
    }
}

#[test]
fn test_payload_only_ignores_stored_profile() {
    let update = ProfileUpdate {
        weight_kg: Some(62.0),
        ..ProfileUpdate::default()
    };
    let stored = stored_profile();
    let changes = changes_of(
        ProfileReconciler::new(RecomputePolicy::PayloadOnly)
            .reconcile(&update, Some(&stored), today())
            .unwrap(),
    );
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.real(ProfileColumn::WeightKg), Some(62.0));
}

#[test]
fn test_merge_stored_recomputes_from_single_field_change() {
    let update = ProfileUpdate {
        weight_kg: Some(60.0),
        ..ProfileUpdate::default()
    };
    let stored = stored_profile();
    let changes = changes_of(
        ProfileReconciler::new(RecomputePolicy::MergeStored)
            .reconcile(&update, Some(&stored), today())
            .unwrap(),
    );

    // 25 years old on 2025-06-15: BMR 1314, very active 2266.65
    let target = changes.real(ProfileColumn::DailyCalorieTarget).unwrap();
    assert!((target - 2266.65).abs() < 1e-6);
    assert!(changes.contains(ProfileColumn::Bmi));
    assert!(changes.contains(ProfileColumn::BodyFatPct));
    assert!(!changes.contains(ProfileColumn::Sex));
}

#[test]
fn test_merge_stored_leaves_metrics_alone_for_name_change() {
    let update = ProfileUpdate {
        name: Some("Ana".into()),
        ..ProfileUpdate::default()
    };
    let stored = stored_profile();
    let changes = changes_of(
        ProfileReconciler::new(RecomputePolicy::MergeStored)
            .reconcile(&update, Some(&stored), today())
            .unwrap(),
    );
    assert_eq!(changes.len(), 1);
    assert!(changes.contains(ProfileColumn::Name));
}

#[test]
fn test_update_payload_ignores_unknown_fields_and_nulls() {
    let update: ProfileUpdate = serde_json::from_str(
        r#"{"name": "Ana", "email": null, "favourite_colour": "green"}"#,
    )
    .unwrap();
    let changes = changes_of(
        ProfileReconciler::default()
            .reconcile(&update, None, today())
            .unwrap(),
    );
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes.get(ProfileColumn::Name),
        Some(&ColumnValue::Text("Ana".into()))
    );
}
