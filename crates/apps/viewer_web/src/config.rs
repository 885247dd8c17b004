use layers::{CatalogError, LayerCatalog, Terrain};
use scene::{ProjectorConfig, ProjectorConfigError, TargetProjector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTAINER_ID: &str = "cesiumContainer";
pub const DEFAULT_BASE_URL: &str = "/BIM-GIS/";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid viewer config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Projector(#[from] ProjectorConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("container_id must not be empty")]
    EmptyContainer,
}

/// Settings handed over by the hosting page as a JSON string.
///
/// Every field is optional; `{}` yields the drainage viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// DOM id of the element the 3D engine mounts into.
    pub container_id: String,
    /// Prefix for static layer files.
    pub base_url: String,
    /// Cesium ion token. Without one the engine's default token is used.
    pub ion_access_token: Option<String>,
    pub world_terrain: bool,
    pub projector: ProjectorConfig,
    /// Overrides the built-in overlay set.
    pub layers: Option<LayerCatalog>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            ion_access_token: None,
            world_terrain: true,
            projector: ProjectorConfig::default(),
            layers: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parses and validates. An empty string means all defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_id.trim().is_empty() {
            return Err(ConfigError::EmptyContainer);
        }
        self.projector()?;
        self.catalog().validate(&self.base_url)?;
        Ok(())
    }

    pub fn projector(&self) -> Result<TargetProjector, ProjectorConfigError> {
        TargetProjector::from_config(&self.projector)
    }

    pub fn catalog(&self) -> LayerCatalog {
        self.layers
            .clone()
            .unwrap_or_else(LayerCatalog::drainage_default)
    }

    pub fn terrain(&self) -> Terrain {
        Terrain::from_world_terrain_flag(self.world_terrain)
    }

    /// The token, if one was supplied and is not blank.
    pub fn ion_token(&self) -> Option<&str> {
        self.ion_access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
