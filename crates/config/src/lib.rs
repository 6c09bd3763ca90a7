//! Application configuration consumed by the session controller and the
//! track renderer. Produced by an external loader (remote fetch or static
//! default); this crate only parses and validates.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TRACK_COLOR: &str = "#caaf15";
pub const DEFAULT_TILE_CACHE: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub min_zoom: f64,
    pub default_zoom: f64,
    pub max_zoom: f64,
    /// `[min_lon, min_lat, max_lon, max_lat]`, geographic degrees.
    pub bbox: Option<[f64; 4]>,
    /// Top/right/bottom/left, pixels.
    pub padding: [f64; 4],
    pub rotation_duration_ms: u64,
    pub projection: String,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 6.0,
            default_zoom: 10.0,
            max_zoom: 18.0,
            bbox: None,
            padding: [0.0; 4],
            rotation_duration_ms: 500,
            projection: "EPSG:3857".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSourceConfig {
    pub name: String,
    /// Must contain `{x}`, `{y}` and `{z}` placeholders.
    pub url_template: String,
    #[serde(default = "default_tile_cache")]
    pub cache_tiles: usize,
}

fn default_tile_cache() -> usize {
    DEFAULT_TILE_CACHE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLineConfig {
    pub enabled: bool,
    /// Altitude threshold (meters) where the middle tier starts.
    pub orange_threshold: f64,
    /// Altitude threshold (meters) where the top tier starts.
    pub red_threshold: f64,
    /// Show the altitude popover alongside the flow line.
    pub quote_show: bool,
}

impl Default for FlowLineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            orange_threshold: 800.0,
            red_threshold: 1500.0,
            quote_show: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiConfig {
    pub enabled: bool,
    /// POIs are hidden below this zoom.
    pub min_zoom: f64,
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_zoom: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub view: MapViewConfig,
    pub tile_sources: Vec<TileSourceConfig>,
    pub track_color: String,
    pub flow_line: FlowLineConfig,
    pub poi: PoiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            view: MapViewConfig::default(),
            tile_sources: Vec::new(),
            track_color: DEFAULT_TRACK_COLOR.to_string(),
            flow_line: FlowLineConfig::default(),
            poi: PoiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    ZoomBoundsOutOfOrder,
    ThresholdsOutOfOrder,
    BadUrlTemplate { name: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::ZoomBoundsOutOfOrder => {
                write!(f, "zoom bounds must satisfy min <= default <= max")
            }
            ConfigError::ThresholdsOutOfOrder => {
                write!(f, "flow-line thresholds must satisfy orange < red")
            }
            ConfigError::BadUrlTemplate { name } => {
                write!(f, "tile source '{name}' is missing an x/y/z placeholder")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.view;
        if !(v.min_zoom <= v.default_zoom && v.default_zoom <= v.max_zoom) {
            return Err(ConfigError::ZoomBoundsOutOfOrder);
        }
        if self.flow_line.orange_threshold >= self.flow_line.red_threshold {
            return Err(ConfigError::ThresholdsOutOfOrder);
        }
        for source in &self.tile_sources {
            let t = &source.url_template;
            if !(t.contains("{x}") && t.contains("{y}") && t.contains("{z}")) {
                return Err(ConfigError::BadUrlTemplate {
                    name: source.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DEFAULT_TILE_CACHE};

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn zoom_bounds_ordering_is_enforced() {
        let mut cfg = AppConfig::default();
        cfg.view.default_zoom = cfg.view.max_zoom + 1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZoomBoundsOutOfOrder));
    }

    #[test]
    fn thresholds_ordering_is_enforced() {
        let mut cfg = AppConfig::default();
        cfg.flow_line.orange_threshold = 1500.0;
        cfg.flow_line.red_threshold = 800.0;
        assert_eq!(cfg.validate(), Err(ConfigError::ThresholdsOutOfOrder));
    }

    #[test]
    fn parses_partial_json_with_defaults() {
        let cfg = AppConfig::from_json(
            r#"{
                "view": { "bbox": [5.9, 45.8, 10.5, 47.8] },
                "tile_sources": [
                    { "name": "base", "url_template": "https://t.test/{z}/{x}/{y}.png" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.view.bbox, Some([5.9, 45.8, 10.5, 47.8]));
        assert_eq!(cfg.tile_sources[0].cache_tiles, DEFAULT_TILE_CACHE);
        assert_eq!(cfg.flow_line.orange_threshold, 800.0);
        assert_eq!(cfg.track_color, "#caaf15");
    }

    #[test]
    fn rejects_template_without_placeholders() {
        let err = AppConfig::from_json(
            r#"{ "tile_sources": [ { "name": "bad", "url_template": "https://t.test/tile.png" } ] }"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::BadUrlTemplate {
                name: "bad".to_string()
            }
        );
    }
}
