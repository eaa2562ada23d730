use serde::{Deserialize, Serialize};

/// Id handed to the first location when the store is empty.
pub const FIRST_LOCATION_ID: i64 = 12345;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub coordinate: LatLng,
}

/// Body of location create and update calls. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocationRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl LocationRequest {
    /// Geocoding query for a new location: every non-empty field, name first.
    pub fn full_address(&self) -> String {
        [&self.name, &self.address, &self.city, &self.state, &self.zip]
            .iter()
            .map(|part| part.as_str())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Geocoding query for an update: street fields only, name and zip are
    /// not part of the query.
    pub fn street_address(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.state)
    }
}
