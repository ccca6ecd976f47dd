use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

/// Coordinates as the Places API reports them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A validated point on the globe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(validation_error(format!("latitude {} out of range", latitude)));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(validation_error(format!("longitude {} out of range", longitude)));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<Coordinates> for Location {
    type Error = Error;

    fn try_from(coordinates: Coordinates) -> Result<Self, Self::Error> {
        Location::new(coordinates.lat, coordinates.lng)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        format!("{},{}", location.latitude, location.longitude)
    }
}

#[test]
fn accepts_valid_coordinates() {
    let location = Location::new(37.483872693672, -122.14900441942).unwrap();

    assert_eq!(location.latitude(), 37.483872693672);
    assert_eq!(location.longitude(), -122.14900441942);
    assert_eq!(String::from(location), "37.483872693672,-122.14900441942");
}

#[test]
fn accepts_boundaries() {
    assert!(Location::new(90.0, 180.0).is_ok());
    assert!(Location::new(-90.0, -180.0).is_ok());
}

#[test]
fn rejects_out_of_range_coordinates() {
    use crate::error::Kind;

    assert!(Location::new(90.1, 0.0).unwrap_err().is(Kind::Validation));
    assert!(Location::new(0.0, -180.5).unwrap_err().is(Kind::Validation));
    assert!(Location::new(f64::NAN, 0.0).is_err());
}
