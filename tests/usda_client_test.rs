// ABOUTME: Integration tests for the USDA food lookup layer
// ABOUTME: Macro extraction rules, portion scaling, mock client behavior and argument validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use macro_tracker::errors::ErrorCode;
use macro_tracker::external::{
    FoodDataSource, FoodDetails, FoodNutrient, MacroNutrients, MockUsdaClient, UsdaClient,
    UsdaClientConfig,
};

fn nutrient(name: &str, unit: &str, amount: f64) -> FoodNutrient {
    FoodNutrient {
        nutrient_id: 0,
        nutrient_name: name.to_owned(),
        unit_name: unit.to_owned(),
        amount,
    }
}

#[test]
fn test_macro_extraction_matches_by_lowercase_name() {
    let macros = MacroNutrients::from_nutrients(&[
        nutrient("PROTEIN", "G", 12.5),
        nutrient("Carbohydrate, by difference", "g", 30.0),
        nutrient("Total lipid (fat)", "g", 4.0),
        nutrient("Energy", "KCAL", 210.0),
        nutrient("Fiber, total dietary", "g", 7.0),
    ]);
    assert_eq!(
        macros,
        MacroNutrients {
            calories: 210.0,
            protein: 12.5,
            carbs: 30.0,
            fat: 4.0,
        }
    );
}

#[test]
fn test_energy_in_kilojoules_is_ignored() {
    let macros = MacroNutrients::from_nutrients(&[
        nutrient("Energy", "kcal", 52.0),
        nutrient("Energy", "kJ", 218.0),
    ]);
    assert_eq!(macros.calories, 52.0);
}

#[test]
fn test_missing_macros_default_to_zero() {
    let macros = MacroNutrients::from_nutrients(&[nutrient("Sodium, Na", "mg", 5.0)]);
    assert_eq!(macros, MacroNutrients::default());
    assert_eq!(MacroNutrients::from_nutrients(&[]), MacroNutrients::default());
}

#[test]
fn test_later_nutrient_overwrites_earlier_match() {
    let macros = MacroNutrients::from_nutrients(&[
        nutrient("Protein", "g", 1.0),
        nutrient("Adjusted Protein", "g", 2.0),
    ]);
    assert_eq!(macros.protein, 2.0);
}

#[test]
fn test_scaling_to_portion() {
    let per_100g = MacroNutrients {
        calories: 165.0,
        protein: 31.0,
        carbs: 0.0,
        fat: 3.6,
    };
    let portion = per_100g.scaled_to(150.0);
    assert!((portion.calories - 247.5).abs() < 1e-9);
    assert!((portion.protein - 46.5).abs() < 1e-9);
    assert!((portion.fat - 5.4).abs() < 1e-9);
    assert_eq!(per_100g.scaled_to(100.0), per_100g);
}

#[tokio::test]
async fn test_mock_search_and_macros() {
    let client = MockUsdaClient::new();

    let results = client.search_foods("chicken", 10).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].fdc_id, 171_477);

    let food = client.get_food_macros(171_688).await.unwrap();
    assert_eq!(food.description, "Apples, raw, with skin");
    assert_eq!(food.macros.calories, 52.0);
    assert!((food.macros.carbs - 13.81).abs() < 1e-9);
}

#[tokio::test]
async fn test_mock_unknown_food_not_found() {
    let err = MockUsdaClient::new().get_food_details(1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_mock_accepts_extra_foods() {
    let client = MockUsdaClient::new().with_food(FoodDetails {
        fdc_id: 42,
        description: "Test lentils".into(),
        data_type: "Foundation".into(),
        food_nutrients: vec![nutrient("Protein", "g", 9.0)],
        serving_size: None,
        serving_size_unit: None,
    });
    let food = client.get_food_macros(42).await.unwrap();
    assert_eq!(food.macros.protein, 9.0);
    assert_eq!(food.macros.calories, 0.0);
}

#[tokio::test]
async fn test_search_arguments_validated_before_any_request() {
    // Unroutable base URL: validation must fail before the network is touched
    let client = UsdaClient::new(UsdaClientConfig {
        api_key: "test".into(),
        base_url: "http://127.0.0.1:9".into(),
        ..UsdaClientConfig::default()
    });

    let err = client.search_foods("   ", 10).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = client.search_foods("apple", 0).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = client.search_foods("apple", 201).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert_eq!(client.cache_stats().await, (0, 0));
}

#[tokio::test]
async fn test_unreachable_upstream_is_external_service_error() {
    let client = UsdaClient::new(UsdaClientConfig {
        api_key: "test".into(),
        base_url: "http://127.0.0.1:9".into(),
        ..UsdaClientConfig::default()
    });

    let err = client.get_food_details(171_477).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(client.cache_stats().await, (0, 0));
}

#[test]
fn test_food_macros_serialize_flat() {
    let food = macro_tracker::external::FoodMacros {
        fdc_id: 1,
        description: "Oats".into(),
        macros: MacroNutrients {
            calories: 389.0,
            protein: 16.9,
            carbs: 66.3,
            fat: 6.9,
        },
    };
    let json = serde_json::to_value(&food).unwrap();
    assert_eq!(json["fdc_id"], 1);
    assert_eq!(json["calories"], 389.0);
    assert_eq!(json["fat"], 6.9);
}

mod against_local_upstream {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve canned USDA responses on an ephemeral port, counting requests
    async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let search_hits = Arc::clone(&hits);
        let detail_hits = Arc::clone(&hits);

        let app = Router::new()
            .route(
                "/foods/search",
                get(move || {
                    search_hits.fetch_add(1, Ordering::SeqCst);
                    async {
                        Json(json!({
                            "totalHits": 1,
                            "foods": [{
                                "fdcId": 2_346_404,
                                "description": "Bananas, raw",
                                "dataType": "Foundation",
                                "publicationDate": "2022-10-28"
                            }]
                        }))
                    }
                }),
            )
            .route(
                "/food/:id",
                get(move |Path(id): Path<u64>| {
                    detail_hits.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if id != 2_346_404 {
                            return Err(StatusCode::NOT_FOUND);
                        }
                        Ok(Json(json!({
                            "fdcId": 2_346_404,
                            "description": "Bananas, raw",
                            "dataType": "Foundation",
                            "foodNutrients": [
                                {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}, "amount": 0.74},
                                {"nutrient": {"id": 1005, "name": "Carbohydrate, by difference", "unitName": "g"}, "amount": 20.1},
                                {"nutrient": {"id": 1004, "name": "Total lipid (fat)", "unitName": "g"}, "amount": 0.29},
                                {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 97.0},
                                {"nutrient": {"id": 1062, "name": "Energy", "unitName": "kJ"}, "amount": 406.0},
                                {"nutrient": {"id": 2000, "name": "Sugars", "unitName": "g"}},
                                {"type": "FoodNutrient"}
                            ]
                        })))
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), hits)
    }

    fn client_for(base_url: String) -> UsdaClient {
        UsdaClient::new(UsdaClientConfig {
            api_key: "test".into(),
            base_url,
            ..UsdaClientConfig::default()
        })
    }

    #[tokio::test]
    async fn test_search_results_are_cached() {
        let (base_url, hits) = spawn_upstream().await;
        let client = client_for(base_url);

        let first = client.search_foods("banana", 5).await.unwrap();
        let second = client.search_foods("banana", 5).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].fdc_id, 2_346_404);
        assert_eq!(first[0].publication_date.as_deref(), Some("2022-10-28"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(client.cache_stats().await, (1, 0));

        client.clear_caches().await;
        client.search_foods("banana", 5).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_details_decoded_into_macros() {
        let (base_url, _hits) = spawn_upstream().await;
        let client = client_for(base_url);

        let details = client.get_food_details(2_346_404).await.unwrap();
        // The entry without nutrient info is skipped, the one without amount reads zero
        assert_eq!(details.food_nutrients.len(), 6);

        let food = client.get_food_macros(2_346_404).await.unwrap();
        assert_eq!(food.macros.calories, 97.0);
        assert!((food.macros.protein - 0.74).abs() < 1e-9);
        assert!((food.macros.carbs - 20.1).abs() < 1e-9);
        assert!((food.macros.fat - 0.29).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_upstream_404_is_not_found() {
        let (base_url, _hits) = spawn_upstream().await;
        let client = client_for(base_url);

        let err = client.get_food_details(1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }
}
