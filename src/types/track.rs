//! Track metadata delivered in response to a track data request.

use serde::{Deserialize, Serialize};

use super::enums::TrackId;

/// A named group of broadcast cameras (e.g. "Helicam", "Onboard").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSet {
    pub name: String,
    /// Camera names in server order.
    pub cameras: Vec<String>,
}

/// Static description of the loaded track and its broadcast surfaces.
///
/// Camera sets keep the order the server transmitted them in; use
/// [`TrackData::camera_set`] for by-name access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackData {
    pub id: TrackId,
    pub name: String,
    pub length_m: i32,
    pub camera_sets: Vec<CameraSet>,
    pub hud_pages: Vec<String>,
}

impl TrackData {
    /// Look up a camera set by name.
    pub fn camera_set(&self, name: &str) -> Option<&CameraSet> {
        self.camera_sets.iter().find(|set| set.name == name)
    }
}
