use serde::Serialize;

use crate::entities::{format_stars, Location};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<Location>,
}

/// Fields returned by a per-place detail query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceDetails {
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<Location>,
}

impl Place {
    pub fn stub(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            website: None,
            rating: None,
            location: None,
        }
    }

    /// Fills the place from a detail query. A rating or location that is
    /// already known is kept.
    pub fn apply_details(&mut self, details: PlaceDetails) {
        if details.website.is_some() {
            self.website = details.website;
        }
        if self.rating.is_none() {
            self.rating = details.rating;
        }
        if self.location.is_none() {
            self.location = details.location;
        }
    }

    /// The rating and website lines sent after a place's card.
    pub fn summary(&self) -> Option<String> {
        let lines: Vec<String> = [
            self.rating.map(format_stars).filter(|stars| !stars.is_empty()),
            self.website.clone().filter(|website| !website.is_empty()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if lines.is_empty() {
            return None;
        }

        Some(lines.join("\n"))
    }
}

#[test]
fn details_fill_a_stub() {
    let mut place = Place::stub("p1", "Bar Marsella");
    let location = Location::new(41.3795, 2.1718).unwrap();

    place.apply_details(PlaceDetails {
        website: Some("http://barmarsella.example".into()),
        rating: Some(4.5),
        location: Some(location),
    });

    assert_eq!(place.website.as_deref(), Some("http://barmarsella.example"));
    assert_eq!(place.rating, Some(4.5));
    assert_eq!(place.location, Some(location));
}

#[test]
fn details_never_replace_a_known_rating() {
    let mut place = Place::stub("p1", "Bar Marsella");
    place.rating = Some(4.0);

    place.apply_details(PlaceDetails {
        rating: Some(2.0),
        ..Default::default()
    });

    assert_eq!(place.rating, Some(4.0));
}

#[test]
fn summary_joins_rating_and_website() {
    let mut place = Place::stub("p1", "Bar Marsella");
    assert_eq!(place.summary(), None);

    place.rating = Some(4.5);
    assert_eq!(place.summary().as_deref(), Some("★★★★ ½"));

    place.website = Some("http://barmarsella.example".into());
    assert_eq!(
        place.summary().as_deref(),
        Some("★★★★ ½\nhttp://barmarsella.example")
    );
}
