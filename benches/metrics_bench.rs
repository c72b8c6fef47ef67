// ABOUTME: Criterion benchmarks for the metrics calculator and profile reconciler
// ABOUTME: Measures formula evaluation and full partial-update reconciliation per policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the body-composition core.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use macro_tracker::metrics::{
    body_fat_percentage, body_mass_index, calculate_energy_expenditure,
    total_daily_energy_expenditure,
};
use macro_tracker::models::{ActivityLevel, Sex};
use macro_tracker::profile::{ProfileReconciler, ProfileUpdate, RecomputePolicy, StoredProfile};

fn bench_formulas(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    group.bench_function("tdee_typed", |b| {
        b.iter(|| {
            total_daily_energy_expenditure(
                black_box(Sex::Female),
                black_box(60.0),
                black_box(160.0),
                black_box(25),
                black_box(ActivityLevel::VeryActive),
            )
        });
    });

    group.bench_function("tdee_from_strings", |b| {
        b.iter(|| {
            calculate_energy_expenditure(
                black_box("lightly_active"),
                black_box(70.0),
                black_box(175.0),
                black_box(30),
                black_box("moderately_active"),
            )
        });
    });

    group.bench_function("bmi_and_body_fat", |b| {
        b.iter(|| {
            body_mass_index(black_box(70.0), black_box(175.0))
                .and_then(|bmi| body_fat_percentage(bmi, black_box(30), Some(Sex::Male)))
        });
    });

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let stored = StoredProfile {
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2),
        sex: Some(Sex::Male),
        height_cm: Some(180.0),
        weight_kg: Some(82.0),
        activity_level: Some(ActivityLevel::ModeratelyActive),
        ..StoredProfile::default()
    };

    let updates = [
        (
            "name_only",
            ProfileUpdate {
                name: Some("Ana".into()),
                ..ProfileUpdate::default()
            },
        ),
        (
            "weight_only",
            ProfileUpdate {
                weight_kg: Some(80.5),
                ..ProfileUpdate::default()
            },
        ),
        (
            "full",
            ProfileUpdate {
                date_of_birth: Some("1990-04-02".into()),
                sex: Some("male".into()),
                height_cm: Some(180.0),
                weight_kg: Some(80.5),
                activity_level: Some("moderately_active".into()),
                ..ProfileUpdate::default()
            },
        ),
    ];

    let mut group = c.benchmark_group("reconcile");
    for policy in [RecomputePolicy::PayloadOnly, RecomputePolicy::MergeStored] {
        let reconciler = ProfileReconciler::new(policy);
        for (name, update) in &updates {
            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), name),
                update,
                |b, update| {
                    b.iter(|| reconciler.reconcile(black_box(update), Some(&stored), today));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_formulas, bench_reconcile);
criterion_main!(benches);
