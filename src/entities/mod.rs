mod event;
mod location;
mod message;
mod place;
mod rating;
mod recommendations;

pub use event::InboundEvent;
pub use location::{Coordinates, Location};
pub use message::OutboundMessage;
pub use place::{Place, PlaceDetails};
pub use rating::format_stars;
pub use recommendations::{Recommendations, Source, RECOMMENDATION_LIMIT, SEARCH_RADIUS_METERS};
