// Shop listing types.
// Defines the shop record and its derived geographic point.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// One honey shop listing.
///
/// Records are identified by `name`; two records with the same name compare
/// equal regardless of their other fields.
#[derive(Debug, Clone, Serialize)]
pub struct ShopRecord {
    pub name: String,
    #[serde(rename = "description")]
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub rating: f64,
    pub address: String,
    /// Normalized `[latitude, longitude]`; empty when the listing has none.
    pub coordinates: Vec<f64>,
    #[serde(rename = "map")]
    pub map_link: String,
    pub website: String,
    /// When this record was decoded. Never written back out.
    #[serde(skip)]
    pub fetched_at: DateTime<Utc>,
}

impl ShopRecord {
    /// The map location of this shop, if its coordinates are usable.
    pub fn coordinate(&self) -> Option<GeoPoint> {
        match self.coordinates.as_slice() {
            [lat, lon, ..] => GeoPoint::new(*lat, *lon),
            _ => None,
        }
    }

    /// A fixed listing for previews and offline demos.
    pub fn sample() -> Self {
        Self {
            name: "Hani Honey Company".to_string(),
            details: "Wholesale and retail honey company with a public shop in Stuart, Florida"
                .to_string(),
            picture: Some("https://hanihoneycompany.com/images/shop.jpg".to_string()),
            rating: 4.4,
            address: "724 S Colorado Ave, Stuart, FL 34997, USA".to_string(),
            coordinates: vec![27.1942, -80.2498],
            map_link: "https://www.google.com/maps/place/Hani+Honey+Company".to_string(),
            website: "https://hanihoneycompany.com".to_string(),
            fetched_at: Utc::now(),
        }
    }
}

impl PartialEq for ShopRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ShopRecord {}

impl Hash for ShopRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
