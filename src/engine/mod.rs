mod deliveries;
mod resolver;

pub use deliveries::DeliveryLog;
pub use resolver::Resolver;

use std::sync::Arc;

use crate::{
    api::{CuratedStore, MessageSender, PlacesProvider},
    entities::{InboundEvent, OutboundMessage, Place},
};

pub const LOCATION_PROMPT: &str = "Send your location to get some delicious recommendations!";

/// Turns inbound events into recommendation messages. Downstream failures are
/// logged here and never reach the webhook caller.
pub struct Engine {
    resolver: Resolver,
    places: Arc<dyn PlacesProvider>,
    sender: Arc<dyn MessageSender>,
    deliveries: DeliveryLog,
    page_id: Option<String>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn CuratedStore>,
        places: Arc<dyn PlacesProvider>,
        sender: Arc<dyn MessageSender>,
        deliveries: DeliveryLog,
    ) -> Self {
        Self {
            resolver: Resolver::new(store, places.clone()),
            places,
            sender,
            deliveries,
            page_id: None,
        }
    }

    /// Ignore messages sent from this page id.
    pub fn with_page_id(mut self, page_id: Option<String>) -> Self {
        self.page_id = page_id;
        self
    }

    #[tracing::instrument(skip_all, fields(user_id = %event.user_id))]
    pub async fn handle_event(&self, event: InboundEvent) {
        if event.is_echo || self.page_id.as_deref() == Some(event.user_id.as_str()) {
            tracing::debug!("ignoring message sent by the page");
            return;
        }

        if let Some(message_id) = &event.message_id {
            if !self.deliveries.first_delivery(message_id).await {
                tracing::info!(%message_id, "ignoring redelivered message");
                return;
            }
        }

        let location = match event.location {
            Some(location) => location,
            None => {
                tracing::info!("no location sent, prompting for one");
                self.notify(&event.user_id, OutboundMessage::text(LOCATION_PROMPT))
                    .await;
                return;
            }
        };

        let recommendations = self.resolver.resolve(&location).await;

        if recommendations.is_empty() {
            tracing::info!("nothing to recommend");
            return;
        }

        self.notify(
            &event.user_id,
            OutboundMessage::text(recommendations.source().headline()),
        )
        .await;

        for place in recommendations.into_places() {
            self.recommend(&event.user_id, place).await;
        }
    }

    async fn recommend(&self, user_id: &str, mut place: Place) {
        if let Err(err) = self.places.enrich(&mut place).await {
            tracing::warn!(%err, place_id = %place.id, "could not enrich place");
        }

        self.notify(user_id, OutboundMessage::location_card(&place))
            .await;

        if let Some(summary) = place.summary() {
            self.notify(user_id, OutboundMessage::text(summary)).await;
        }
    }

    async fn notify(&self, user_id: &str, message: OutboundMessage) {
        if let Err(err) = self.sender.send(user_id, message).await {
            tracing::warn!(%err, "error sending response to messenger");
        }
    }
}
