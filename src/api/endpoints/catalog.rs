//! Static catalogues: city lookup and treatment specialties.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::funnel::location::{self, City};
use crate::funnel::rates::LocationTier;
use crate::funnel::specialty::{Specialty, SPECIALTIES};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CityResult {
    pub label: String,
    pub name: &'static str,
    pub state: &'static str,
    pub population: u64,
    pub tier: LocationTier,
}

impl From<&City> for CityResult {
    fn from(city: &City) -> Self {
        Self {
            label: city.label(),
            name: city.name,
            state: city.state,
            population: city.population,
            tier: city.tier,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub name: String,
    pub tier: LocationTier,
    pub population: u64,
}

/// `GET /api/locations?q=` — up to five matching cities.
pub async fn search_locations(Query(query): Query<SearchQuery>) -> Json<Vec<CityResult>> {
    let results = location::search(&query.q)
        .into_iter()
        .map(CityResult::from)
        .collect();
    Json(results)
}

/// `GET /api/locations/classify?name=`
pub async fn classify_location(
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let classification = location::classify(&query.name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown location: {}", query.name.trim())))?;
    Ok(Json(ClassifyResponse {
        name: query.name.trim().to_string(),
        tier: classification.tier,
        population: classification.population,
    }))
}

/// `GET /api/specialties`
pub async fn list_specialties() -> Json<&'static [Specialty]> {
    Json(SPECIALTIES)
}
