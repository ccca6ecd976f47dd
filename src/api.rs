use async_trait::async_trait;

use crate::entities::{Location, OutboundMessage, Place};
use crate::error::Error;

/// Vetted places, preferred over generic search results.
#[async_trait]
pub trait CuratedStore: Send + Sync {
    /// Curated places near `location`, nearest first, at most three.
    async fn lookup(&self, location: &Location) -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Stubs for eating places near `location`, in provider rank order, at most three.
    async fn search(&self, location: &Location) -> Result<Vec<Place>, Error>;

    /// Fills website, rating and location of `place` from a detail query.
    async fn enrich(&self, place: &mut Place) -> Result<(), Error>;
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, user_id: &str, message: OutboundMessage) -> Result<(), Error>;

    async fn send_text(&self, user_id: &str, body: &str) -> Result<(), Error> {
        self.send(user_id, OutboundMessage::text(body)).await
    }

    async fn send_location_card(&self, user_id: &str, place: &Place) -> Result<(), Error> {
        self.send(user_id, OutboundMessage::location_card(place))
            .await
    }
}
