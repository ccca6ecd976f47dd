#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use foodbot::api::{CuratedStore, MessageSender, PlacesProvider};
use foodbot::engine::{DeliveryLog, Engine};
use foodbot::entities::{Location, OutboundMessage, Place, PlaceDetails};
use foodbot::error::{database_error, provider_error, send_error, Error};

pub const VERIFY_TOKEN: &str = "hunter2";

#[derive(Default)]
pub struct FakeStore {
    places: Vec<Place>,
    fail: bool,
    lookups: AtomicUsize,
}

impl FakeStore {
    pub fn with(places: Vec<Place>) -> Arc<Self> {
        Arc::new(Self {
            places,
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CuratedStore for FakeStore {
    async fn lookup(&self, _: &Location) -> Result<Vec<Place>, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(database_error("connection refused"));
        }

        Ok(self.places.clone())
    }
}

#[derive(Default)]
pub struct FakeProvider {
    places: Vec<Place>,
    details: HashMap<String, PlaceDetails>,
    fail_search: bool,
    searches: AtomicUsize,
    enrichments: AtomicUsize,
}

impl FakeProvider {
    pub fn with(places: Vec<Place>) -> Self {
        Self {
            places,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_search: true,
            ..Default::default()
        }
    }

    pub fn detail(mut self, id: &str, details: PlaceDetails) -> Self {
        self.details.insert(id.into(), details);
        self
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn enrichments(&self) -> usize {
        self.enrichments.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesProvider for FakeProvider {
    async fn search(&self, _: &Location) -> Result<Vec<Place>, Error> {
        self.searches.fetch_add(1, Ordering::SeqCst);

        if self.fail_search {
            return Err(provider_error("OVER_QUERY_LIMIT"));
        }

        Ok(self.places.clone())
    }

    async fn enrich(&self, place: &mut Place) -> Result<(), Error> {
        self.enrichments.fetch_add(1, Ordering::SeqCst);

        let details = self
            .details
            .get(&place.id)
            .cloned()
            .ok_or_else(|| provider_error("NOT_FOUND"))?;

        place.apply_details(details);

        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, OutboundMessage)>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records every message but reports each send as rejected.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn sent(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent().into_iter().map(|(_, message)| message).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, user_id: &str, message: OutboundMessage) -> Result<(), Error> {
        self.sent.lock().unwrap().push((user_id.into(), message));

        if self.fail {
            return Err(send_error("(#100) No matching user found"));
        }

        Ok(())
    }
}

pub fn engine(
    store: Arc<FakeStore>,
    provider: Arc<FakeProvider>,
    sender: Arc<RecordingSender>,
) -> Engine {
    Engine::new(
        store,
        provider,
        sender,
        DeliveryLog::new(chrono::Duration::minutes(10)),
    )
}

pub fn location() -> Location {
    Location::new(37.483872693672, -122.14900441942).unwrap()
}

pub fn details(lat: f64, lng: f64, rating: f64, website: &str) -> PlaceDetails {
    PlaceDetails {
        website: Some(website.into()),
        rating: Some(rating),
        location: Some(Location::new(lat, lng).unwrap()),
    }
}

pub fn stubs(ids: &[&str]) -> Vec<Place> {
    ids.iter()
        .map(|id| Place::stub(*id, format!("Place {}", id)))
        .collect()
}
