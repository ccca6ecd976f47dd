use std::sync::Arc;

use crate::{
    api::{CuratedStore, PlacesProvider},
    entities::{Location, Recommendations, Source},
};

/// Picks the single source that answers a location: curated places when there
/// are any, the places provider otherwise.
pub struct Resolver {
    store: Arc<dyn CuratedStore>,
    places: Arc<dyn PlacesProvider>,
}

impl Resolver {
    pub fn new(store: Arc<dyn CuratedStore>, places: Arc<dyn PlacesProvider>) -> Self {
        Self { store, places }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, location: &Location) -> Recommendations {
        match self.store.lookup(location).await {
            Ok(places) if !places.is_empty() => {
                tracing::info!("answering with {} curated places", places.len());
                return Recommendations::new(Source::Curated, places);
            }
            Ok(_) => tracing::info!("no curated places nearby, searching places provider"),
            Err(err) => {
                tracing::warn!(%err, "curated lookup failed, searching places provider")
            }
        }

        match self.places.search(location).await {
            Ok(places) => Recommendations::new(Source::Provider, places),
            Err(err) => {
                tracing::warn!(%err, "places search failed");
                Recommendations::empty(Source::Provider)
            }
        }
    }
}
