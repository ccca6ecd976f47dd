use serde::Serialize;

use crate::entities::Place;

pub const RECOMMENDATION_LIMIT: usize = 3;

/// Radius around the user searched by both recommendation sources.
pub const SEARCH_RADIUS_METERS: u32 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Curated,
    Provider,
}

impl Source {
    /// The text sent ahead of the place cards, telling the user where they came from.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Curated => {
                "Researching this area... here are some of our hand-picked favourites nearby:"
            }
            Self::Provider => "Researching this area... here are some popular spots nearby:",
        }
    }
}

/// Places from a single source, never more than [`RECOMMENDATION_LIMIT`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendations {
    source: Source,
    places: Vec<Place>,
}

impl Recommendations {
    pub fn new(source: Source, mut places: Vec<Place>) -> Self {
        places.truncate(RECOMMENDATION_LIMIT);

        Self { source, places }
    }

    pub fn empty(source: Source) -> Self {
        Self::new(source, vec![])
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn into_places(self) -> Vec<Place> {
        self.places
    }
}

#[test]
fn caps_places_and_keeps_order() {
    let places = (1..=5)
        .map(|n| Place::stub(format!("p{}", n), format!("Place {}", n)))
        .collect();

    let recommendations = Recommendations::new(Source::Provider, places);

    let ids: Vec<_> = recommendations.places().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
    assert_eq!(recommendations.source(), Source::Provider);
}

#[test]
fn headlines_name_the_source() {
    assert!(Source::Curated.headline().starts_with("Researching this area"));
    assert!(Source::Provider.headline().starts_with("Researching this area"));
    assert_ne!(Source::Curated.headline(), Source::Provider.headline());
}
