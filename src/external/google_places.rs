use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    api::PlacesProvider,
    config::PlacesConfig,
    entities::{
        Coordinates, Location, Place, PlaceDetails, RECOMMENDATION_LIMIT, SEARCH_RADIUS_METERS,
    },
    error::{provider_error, Error},
};

const SEARCH_TYPES: &str = "food";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    place_id: String,
    #[serde(default)]
    name: String,
    rating: Option<f64>,
    website: Option<String>,
    geometry: Option<Geometry>,
    business_status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DetailsResult {
    website: Option<String>,
    rating: Option<f64>,
    geometry: Option<Geometry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    result: Option<T>,
    results: Option<T>,
    error_message: Option<String>,
}

impl<T> Response<T> {
    fn ensure_status(&self, accepted: &[&str]) -> Result<(), Error> {
        if accepted.contains(&self.status.as_str()) {
            return Ok(());
        }

        Err(provider_error(match &self.error_message {
            Some(message) => format!("{}: {}", self.status, message),
            None => self.status.clone(),
        }))
    }
}

impl Geometry {
    fn into_location(self) -> Option<Location> {
        Location::try_from(self.location).ok()
    }
}

impl SearchResult {
    fn is_open_for_business(&self) -> bool {
        !matches!(
            self.business_status.as_deref(),
            Some("CLOSED_TEMPORARILY") | Some("CLOSED_PERMANENTLY")
        )
    }
}

impl From<SearchResult> for Place {
    fn from(result: SearchResult) -> Self {
        let mut place = Place::stub(result.place_id, result.name);
        place.rating = result.rating;
        place.website = result.website;
        place.location = result.geometry.and_then(Geometry::into_location);
        place
    }
}

impl From<DetailsResult> for PlaceDetails {
    fn from(result: DetailsResult) -> Self {
        Self {
            website: result.website,
            rating: result.rating,
            location: result.geometry.and_then(Geometry::into_location),
        }
    }
}

/// Nearby search and place details against the Google Places web service.
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    open_now: bool,
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(provider_error)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').into(),
            api_key: config.api_key.clone(),
            open_now: config.open_now,
        })
    }

    async fn get<T>(&self, request: reqwest::RequestBuilder) -> Result<Response<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let res = request
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(provider_error)?;

        let status_code = res.status();

        if status_code != StatusCode::OK {
            return Err(provider_error(format!("unexpected status {}", status_code)));
        }

        res.json().await.map_err(provider_error)
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    #[tracing::instrument(skip(self))]
    async fn search(&self, location: &Location) -> Result<Vec<Place>, Error> {
        let url = format!("{}/nearbysearch/json", self.api_base);

        let mut request = self
            .client
            .get(url)
            .query(&[("location", String::from(*location))])
            .query(&[("radius", SEARCH_RADIUS_METERS)])
            .query(&[("types", SEARCH_TYPES)]);

        if self.open_now {
            request = request.query(&[("opennow", "true")]);
        }

        let data: Response<Vec<SearchResult>> = self.get(request).await?;
        data.ensure_status(&["OK", "ZERO_RESULTS"])?;

        let places: Vec<Place> = data
            .results
            .unwrap_or_default()
            .into_iter()
            .filter(SearchResult::is_open_for_business)
            .take(RECOMMENDATION_LIMIT)
            .map(Place::from)
            .collect();

        tracing::debug!("places search returned {} places", places.len());

        Ok(places)
    }

    #[tracing::instrument(skip(self, place), fields(place_id = %place.id))]
    async fn enrich(&self, place: &mut Place) -> Result<(), Error> {
        let url = format!("{}/details/json", self.api_base);

        let request = self
            .client
            .get(url)
            .query(&[("placeid", place.id.as_str())]);

        let data: Response<DetailsResult> = self.get(request).await?;
        data.ensure_status(&["OK"])?;

        let details = data
            .result
            .ok_or_else(|| provider_error("details response without a result"))?;

        place.apply_details(details.into());

        Ok(())
    }
}
