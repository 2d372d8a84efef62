use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranscodeError;

/// Separator between latitude and longitude in the stored form.
pub const COORDINATE_SEPARATOR: char = ';';

/// A latitude/longitude pair.
///
/// Stored as the text `"<lat>;<long>"`. Both halves use the shortest
/// decimal form that parses back to the same `f64`, so the round trip is
/// exact.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The stored text form.
    pub fn to_store_string(&self) -> String {
        self.to_string()
    }

    /// Parse the stored text form.
    pub fn parse(s: &str) -> Result<Self, TranscodeError> {
        let malformed = || TranscodeError::mismatch("geo-coordinate \"<lat>;<long>\"", format!("{s:?}"));
        let (lat, long) = s.split_once(COORDINATE_SEPARATOR).ok_or_else(malformed)?;
        let latitude = lat.parse::<f64>().map_err(|_| malformed())?;
        let longitude = long.parse::<f64>().map_err(|_| malformed())?;
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.latitude, COORDINATE_SEPARATOR, self.longitude
        )
    }
}

impl FromStr for GeoCoordinate {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_coordinate_formats_exactly() {
        let c = GeoCoordinate::new(37.331274, -122.030397);
        assert_eq!(c.to_store_string(), "37.331274;-122.030397");
        assert_eq!(GeoCoordinate::parse("37.331274;-122.030397").unwrap(), c);
    }

    #[test]
    fn missing_separator_is_type_mismatch() {
        let err = GeoCoordinate::parse("37.331274,-122.030397").unwrap_err();
        assert!(matches!(err, TranscodeError::TypeMismatch { .. }));
    }

    #[test]
    fn non_numeric_half_is_type_mismatch() {
        assert!(GeoCoordinate::parse("north;-122.0").is_err());
        assert!(GeoCoordinate::parse("37.0;").is_err());
        assert!(GeoCoordinate::parse("1;2;3").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let c: GeoCoordinate = "0;0".parse().unwrap();
        assert_eq!(c, GeoCoordinate::new(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn text_form_roundtrips(lat in -90.0f64..=90.0, long in -180.0f64..=180.0) {
            let c = GeoCoordinate::new(lat, long);
            let parsed = GeoCoordinate::parse(&c.to_store_string()).unwrap();
            prop_assert_eq!(parsed, c);
        }
    }
}
