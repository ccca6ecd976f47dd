use serde::Serialize;

use crate::entities::Place;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text {
        body: String,
    },
    LocationCard {
        title: String,
        /// `None` when the place's coordinates are unknown; the card then
        /// carries only its title and map link.
        map_image_url: Option<String>,
        map_link_url: String,
    },
}

impl OutboundMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    pub fn location_card(place: &Place) -> Self {
        Self::LocationCard {
            title: place.name.clone(),
            map_image_url: place.location.map(|location| {
                format!(
                    "https://maps.googleapis.com/maps/api/staticmap?markers=color:red|label:B|{},{}&size=360x360&zoom=13",
                    location.latitude(),
                    location.longitude()
                )
            }),
            map_link_url: format!("https://www.google.com/maps/place/?q=place_id:{}", place.id),
        }
    }
}

#[test]
fn location_card_urls_are_derived_from_the_place() {
    use crate::entities::Location;

    let mut place = Place::stub("ChIJ-bar-marsella", "Bar Marsella");
    place.location = Some(Location::new(37.483872693672, -122.14900441942).unwrap());

    let card = OutboundMessage::location_card(&place);

    assert_eq!(
        card,
        OutboundMessage::LocationCard {
            title: "Bar Marsella".into(),
            map_image_url: Some("https://maps.googleapis.com/maps/api/staticmap?markers=color:red|label:B|37.483872693672,-122.14900441942&size=360x360&zoom=13".into()),
            map_link_url: "https://www.google.com/maps/place/?q=place_id:ChIJ-bar-marsella".into(),
        }
    );
}

#[test]
fn place_without_location_still_gets_a_map_link() {
    let place = Place::stub("p1", "Bar Marsella");

    let card = OutboundMessage::location_card(&place);

    assert_eq!(
        card,
        OutboundMessage::LocationCard {
            title: "Bar Marsella".into(),
            map_image_url: None,
            map_link_url: "https://www.google.com/maps/place/?q=place_id:p1".into(),
        }
    );
}
