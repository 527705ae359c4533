//! Zip-code geocoding collaborator
//!
//! Geo-distance search resolves a zip code to coordinates before the query
//! is compiled. The lookup lives behind a trait so callers can plug in any
//! source; [`StaticGeocoder`] serves a fixed table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Result;

/// A latitude/longitude pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Resolves zip codes to coordinates
///
/// `Ok(None)` means the zip is unknown; the compiler turns that into a hard
/// failure because geo search cannot silently degrade to a non-geo query.
pub trait Geocoder {
    fn coordinates_for_zip(&self, zip: &str) -> Result<Option<GeoPoint>>;
}

/// Table-backed geocoder
#[derive(Clone, Debug, Default)]
pub struct StaticGeocoder {
    zips: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new(zips: HashMap<String, GeoPoint>) -> Self {
        Self { zips }
    }

    /// Add a single zip entry, replacing any previous one
    pub fn with_zip(mut self, zip: impl Into<String>, point: GeoPoint) -> Self {
        self.zips.insert(zip.into(), point);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn coordinates_for_zip(&self, zip: &str) -> Result<Option<GeoPoint>> {
        Ok(self.zips.get(zip).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_geocoder() {
        let geocoder =
            StaticGeocoder::default().with_zip("94132", GeoPoint::new(37.7211, -122.4754));

        let point = geocoder.coordinates_for_zip("94132").unwrap().unwrap();
        assert_eq!(point.lat, 37.7211);
        assert_eq!(point.lon, -122.4754);

        assert!(geocoder.coordinates_for_zip("00000").unwrap().is_none());
    }
}
