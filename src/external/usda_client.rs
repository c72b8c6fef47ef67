// ABOUTME: USDA FoodData Central API client for nutritional data retrieval
// ABOUTME: Implements food search, detail retrieval, macro extraction, caching, and rate limiting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! USDA `FoodData` Central API Client
//!
//! The server proxies USDA so the API key never reaches the browser. Two
//! operations are exposed: search by free text and fetch by `FoodData` Central
//! id. Detail lookups are usually reduced to four macros per 100 g.
//!
//! # Features
//! - Food search with page size limits
//! - Detailed food information retrieval
//! - 24-hour caching to minimize API calls
//! - Rate limiting (30 requests per minute by default)
//! - Mock client for testing
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>
//!
//! # Example
//! ```rust,no_run
//! use macro_tracker::external::usda_client::{FoodDataSource, UsdaClient, UsdaClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UsdaClient::new(UsdaClientConfig {
//!     api_key: "your_api_key".to_owned(),
//!     ..UsdaClientConfig::default()
//! });
//! let results = client.search_foods("apple", 10).await?;
//! let macros = client.get_food_macros(results[0].fdc_id).await?;
//! println!("{} kcal per 100 g", macros.macros.calories);
//! # Ok(())
//! # }
//! ```

use crate::constants::usda;
use crate::logging::AppLogger;
use async_trait::async_trait;
use macro_tracker_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
    /// Rate limit per minute (default: 30)
    pub rate_limit_per_minute: u32,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: usda::BASE_URL.to_owned(),
            cache_ttl_secs: usda::CACHE_TTL_SECS,
            rate_limit_per_minute: usda::RATE_LIMIT_PER_MINUTE,
        }
    }
}

/// USDA Food Search Result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSearchResult {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g., "Survey (FNDDS)", "Foundation", "SR Legacy")
    pub data_type: String,
    /// Publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// Brand owner (for branded foods)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
}

/// USDA Food Nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    /// Nutrient ID
    pub nutrient_id: u32,
    /// Nutrient name (e.g., "Protein", "Energy")
    pub nutrient_name: String,
    /// Nutrient unit (e.g., "g", "kcal", "mg")
    pub unit_name: String,
    /// Amount per 100g
    pub amount: f64,
}

/// Detailed USDA Food Information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetails {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type
    pub data_type: String,
    /// List of nutrients with amounts
    pub food_nutrients: Vec<FoodNutrient>,
    /// Portion information (serving size)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    /// Unit of `serving_size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
}

/// The four macros tracked per food, per 100 g unless scaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroNutrients {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrate (by difference) in grams
    pub carbs: f64,
    /// Total lipid (fat) in grams
    pub fat: f64,
}

impl MacroNutrients {
    /// Extract macros from a USDA nutrient list
    ///
    /// Matching is by lowercase nutrient name. Energy only counts when
    /// reported in kcal (USDA also lists kJ). A later matching nutrient
    /// replaces an earlier one; anything not found stays zero.
    #[must_use]
    pub fn from_nutrients(nutrients: &[FoodNutrient]) -> Self {
        let mut macros = Self::default();
        for nutrient in nutrients {
            let name = nutrient.nutrient_name.to_lowercase();
            let unit = nutrient.unit_name.to_lowercase();
            if name.contains("energy") && unit.contains("kcal") {
                macros.calories = nutrient.amount;
            } else if name.contains("protein") {
                macros.protein = nutrient.amount;
            } else if name.contains("carbohydrate, by difference") {
                macros.carbs = nutrient.amount;
            } else if name.contains("total lipid (fat)") {
                macros.fat = nutrient.amount;
            }
        }
        macros
    }

    /// Scale per-100 g values to a portion of `quantity_g` grams
    #[must_use]
    pub fn scaled_to(self, quantity_g: f64) -> Self {
        let factor = quantity_g / 100.0;
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

/// Macro summary for one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodMacros {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Macros per 100 g
    #[serde(flatten)]
    pub macros: MacroNutrients,
}

impl From<&FoodDetails> for FoodMacros {
    fn from(details: &FoodDetails) -> Self {
        Self {
            fdc_id: details.fdc_id,
            description: details.description.clone(),
            macros: MacroNutrients::from_nutrients(&details.food_nutrients),
        }
    }
}

/// Food-composition lookup collaborator
#[async_trait]
pub trait FoodDataSource: Send + Sync {
    /// Search for foods by free-text query
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty query or a page size outside 1..=200,
    /// or an external-service error if the lookup fails
    async fn search_foods(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodSearchResult>>;

    /// Get detailed information for a specific food by FDC ID
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the food does not exist, or an
    /// external-service error if the lookup fails
    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails>;

    /// Get the four tracked macros for a food
    ///
    /// # Errors
    ///
    /// Same as [`FoodDataSource::get_food_details`]
    async fn get_food_macros(&self, fdc_id: u64) -> AppResult<FoodMacros> {
        let details = self.get_food_details(fdc_id).await?;
        Ok(FoodMacros::from(&details))
    }
}

/// Validate search arguments shared by every implementation
fn validate_search(query: &str, page_size: u32) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::invalid_input("Search query cannot be empty"));
    }
    if page_size == 0 || page_size > usda::MAX_PAGE_SIZE {
        return Err(AppError::invalid_input(format!(
            "Page size must be between 1 and {}",
            usda::MAX_PAGE_SIZE
        )));
    }
    Ok(())
}

/// USDA API search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFoodResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFoodResponse {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    data_type: String,
    publication_date: Option<String>,
    brand_owner: Option<String>,
}

impl From<SearchFoodResponse> for FoodSearchResult {
    fn from(food: SearchFoodResponse) -> Self {
        Self {
            fdc_id: food.fdc_id,
            description: food.description,
            data_type: food.data_type,
            publication_date: food.publication_date,
            brand_owner: food.brand_owner,
        }
    }
}

/// USDA API food details response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetailsResponse {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    data_type: String,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrientResponse>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    unit_name: String,
}

impl From<FoodDetailsResponse> for FoodDetails {
    fn from(response: FoodDetailsResponse) -> Self {
        let food_nutrients = response
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let nutrient = n.nutrient?;
                Some(FoodNutrient {
                    nutrient_id: nutrient.id,
                    nutrient_name: nutrient.name,
                    unit_name: nutrient.unit_name,
                    amount: n.amount.unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            fdc_id: response.fdc_id,
            description: response.description,
            data_type: response.data_type,
            food_nutrients,
            serving_size: response.serving_size,
            serving_size_unit: response.serving_size_unit,
        }
    }
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Rate limiter for API requests
#[derive(Debug)]
struct RateLimiter {
    requests: Vec<Instant>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    const fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: Vec::new(),
            limit,
            window,
        }
    }

    /// Check if a request can be made, removing expired entries
    fn can_request(&mut self) -> bool {
        let now = Instant::now();
        self.requests
            .retain(|&t| now.duration_since(t) < self.window);
        self.requests.len() < self.limit as usize
    }

    /// Record a new request
    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }

    /// Wait until a request can be made
    async fn wait_if_needed(&mut self) {
        while !self.can_request() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<FoodSearchResult>>>>>,
    details_cache: Arc<RwLock<HashMap<u64, CacheEntry<FoodDetails>>>>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl UsdaClient {
    /// Create a new USDA API client
    #[must_use]
    pub fn new(config: UsdaClientConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));

        Self {
            config,
            http_client: reqwest::Client::new(),
            search_cache: Arc::new(RwLock::new(HashMap::new())),
            details_cache: Arc::new(RwLock::new(HashMap::new())),
            rate_limiter: Arc::new(RwLock::new(rate_limiter)),
        }
    }

    /// Clear all caches (useful for testing)
    pub async fn clear_caches(&self) {
        self.search_cache.write().await.clear();
        self.details_cache.write().await.clear();
    }

    /// Get cache statistics as `(search entries, detail entries)`
    pub async fn cache_stats(&self) -> (usize, usize) {
        let search_count = self.search_cache.read().await.len();
        let details_count = self.details_cache.read().await.len();
        (search_count, details_count)
    }

    fn cache_expiry(&self) -> Instant {
        Instant::now() + Duration::from_secs(self.config.cache_ttl_secs)
    }

    async fn acquire_rate_limit(&self) {
        let mut limiter = self.rate_limiter.write().await;
        limiter.wait_if_needed().await;
        limiter.record_request();
    }

    /// Send a GET request and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        self.acquire_rate_limit().await;

        let url = format!("{}{endpoint}", self.config.base_url);
        let started = Instant::now();
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                AppLogger::log_upstream_call(usda::SERVICE_NAME, endpoint, false, elapsed_ms, None);
                return Err(AppError::external_service(usda::SERVICE_NAME, e.to_string()));
            }
        };

        let status = response.status();
        AppLogger::log_upstream_call(
            usda::SERVICE_NAME,
            endpoint,
            status.is_success(),
            elapsed_ms,
            Some(status.as_u16()),
        );

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Food at {endpoint}")));
        }
        if !status.is_success() {
            return Err(AppError::external_service(
                usda::SERVICE_NAME,
                format!(
                    "HTTP {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(usda::SERVICE_NAME, format!("JSON parse error: {e}"))
        })
    }
}

#[async_trait]
impl FoodDataSource for UsdaClient {
    async fn search_foods(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodSearchResult>> {
        validate_search(query, page_size)?;

        let cache_key = format!("{query}:{page_size}");
        {
            let cache = self.search_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        let page_size = page_size.to_string();
        let search_response: SearchResponse = self
            .get_json("/foods/search", &[("query", query), ("pageSize", &page_size)])
            .await?;
        let foods: Vec<FoodSearchResult> = search_response
            .foods
            .into_iter()
            .map(FoodSearchResult::from)
            .collect();

        self.search_cache.write().await.insert(
            cache_key,
            CacheEntry {
                data: foods.clone(),
                expires_at: self.cache_expiry(),
            },
        );

        Ok(foods)
    }

    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        {
            let cache = self.details_cache.read().await;
            if let Some(entry) = cache.get(&fdc_id) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        let details_response: FoodDetailsResponse =
            self.get_json(&format!("/food/{fdc_id}"), &[]).await?;
        let food_details = FoodDetails::from(details_response);

        self.details_cache.write().await.insert(
            fdc_id,
            CacheEntry {
                data: food_details.clone(),
                expires_at: self.cache_expiry(),
            },
        );

        Ok(food_details)
    }
}

/// Mock USDA client for testing (no API calls)
pub struct MockUsdaClient {
    mock_foods: HashMap<u64, FoodDetails>,
}

impl MockUsdaClient {
    /// Create a new mock client with predefined test data
    #[must_use]
    pub fn new() -> Self {
        let mut mock_foods = HashMap::new();

        // Mock food: Chicken breast (FDC ID: 171_477)
        mock_foods.insert(
            171_477,
            FoodDetails {
                fdc_id: 171_477,
                description: "Chicken, breast, meat only, cooked, roasted".to_owned(),
                data_type: "SR Legacy".to_owned(),
                food_nutrients: vec![
                    mock_nutrient(1003, "Protein", "g", 31.02),
                    mock_nutrient(1004, "Total lipid (fat)", "g", 3.57),
                    mock_nutrient(1005, "Carbohydrate, by difference", "g", 0.0),
                    mock_nutrient(1008, "Energy", "kcal", 165.0),
                ],
                serving_size: Some(100.0),
                serving_size_unit: Some("g".to_owned()),
            },
        );

        // Mock food: Apple (FDC ID: 171_688), energy reported in kJ as well
        mock_foods.insert(
            171_688,
            FoodDetails {
                fdc_id: 171_688,
                description: "Apples, raw, with skin".to_owned(),
                data_type: "SR Legacy".to_owned(),
                food_nutrients: vec![
                    mock_nutrient(1003, "Protein", "g", 0.26),
                    mock_nutrient(1004, "Total lipid (fat)", "g", 0.17),
                    mock_nutrient(1005, "Carbohydrate, by difference", "g", 13.81),
                    mock_nutrient(1008, "Energy", "kcal", 52.0),
                    mock_nutrient(1062, "Energy", "kJ", 218.0),
                ],
                serving_size: Some(182.0),
                serving_size_unit: Some("g".to_owned()),
            },
        );

        Self { mock_foods }
    }

    /// Add or replace a mock food
    #[must_use]
    pub fn with_food(mut self, food: FoodDetails) -> Self {
        self.mock_foods.insert(food.fdc_id, food);
        self
    }
}

impl Default for MockUsdaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_nutrient(id: u32, name: &str, unit: &str, amount: f64) -> FoodNutrient {
    FoodNutrient {
        nutrient_id: id,
        nutrient_name: name.to_owned(),
        unit_name: unit.to_owned(),
        amount,
    }
}

#[async_trait]
impl FoodDataSource for MockUsdaClient {
    async fn search_foods(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodSearchResult>> {
        validate_search(query, page_size)?;

        let query_lower = query.to_lowercase();
        let mut results: Vec<FoodSearchResult> = self
            .mock_foods
            .values()
            .filter(|food| food.description.to_lowercase().contains(&query_lower))
            .map(|food| FoodSearchResult {
                fdc_id: food.fdc_id,
                description: food.description.clone(),
                data_type: food.data_type.clone(),
                publication_date: None,
                brand_owner: None,
            })
            .collect();
        results.sort_by_key(|food| food.fdc_id);
        results.truncate(page_size as usize);

        Ok(results)
    }

    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        self.mock_foods
            .get(&fdc_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Food with FDC ID {fdc_id}")))
    }
}
