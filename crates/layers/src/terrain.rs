use serde::{Deserialize, Serialize};

/// Elevation model the engine renders under the overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Smooth WGS84 ellipsoid, no elevation data.
    Ellipsoid,
    /// The engine's global terrain service.
    #[default]
    World,
}

impl Terrain {
    pub fn from_world_terrain_flag(enabled: bool) -> Self {
        if enabled { Terrain::World } else { Terrain::Ellipsoid }
    }

    pub fn is_world(self) -> bool {
        self == Terrain::World
    }
}
