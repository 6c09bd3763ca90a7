use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use canvas::{CanvasError, LayerId, MapCanvas};
use foundation::proj::lon_lat_to_mercator;
use runtime::notice::kind;
use runtime::NoticeBus;

/// Keys share this prefix so an external housekeeping routine can clear the
/// whole family in bulk.
pub const STORAGE_PREFIX: &str = "map.custom.";
pub const TRACK_KEY: &str = "map.custom.track";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Serialize(msg) => write!(f, "track serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// String-keyed durable storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProperties {
    pub id: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub altitude: Vec<f64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A user-drawn track as stored: geographic vertices plus properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTrack {
    pub coordinates: Vec<[f64; 2]>,
    pub properties: TrackProperties,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedCollection {
    tracks: Vec<PersistedTrack>,
}

/// A persisted track reconstructed for rendering: projected geometry, the
/// original properties, and a per-reload synthetic identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredTrack {
    pub id: String,
    pub line: Vec<[f64; 2]>,
    pub properties: TrackProperties,
    pub start_marker: [f64; 2],
    pub end_marker: [f64; 2],
}

/// Persists the single user-drawn track under one well-known key.
#[derive(Debug)]
pub struct TrackStore {
    key: String,
}

impl Default for TrackStore {
    fn default() -> Self {
        Self {
            key: TRACK_KEY.to_string(),
        }
    }
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the persisted entry; only one track is ever retained.
    /// The write and the notification happen together or not at all.
    pub fn save(
        &self,
        storage: &mut dyn KeyValueStore,
        track: &PersistedTrack,
        bus: &mut NoticeBus,
    ) -> Result<(), StoreError> {
        let collection = PersistedCollection {
            tracks: vec![track.clone()],
        };
        let raw = serde_json::to_string(&collection)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        storage.set(&self.key, &raw);
        bus.emit(kind::TRACK_SAVED, track.properties.id.clone());
        Ok(())
    }

    /// Restore the persisted collection. Malformed or absent data yields an
    /// empty result; entries with no vertices are dropped (nothing to
    /// render, nothing to mark).
    pub fn load(&self, storage: &dyn KeyValueStore) -> Vec<RestoredTrack> {
        let Some(raw) = storage.get(&self.key) else {
            return Vec::new();
        };
        let collection: PersistedCollection = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        let mut out = Vec::new();
        for (index, entry) in collection.tracks.into_iter().enumerate() {
            let (Some(first), Some(last)) =
                (entry.coordinates.first(), entry.coordinates.last())
            else {
                continue;
            };
            let start_marker = lon_lat_to_mercator(*first);
            let end_marker = lon_lat_to_mercator(*last);
            let line = entry
                .coordinates
                .iter()
                .map(|c| lon_lat_to_mercator(*c))
                .collect();
            out.push(RestoredTrack {
                id: format!("{}-{}", entry.properties.id, index),
                line,
                properties: entry.properties,
                start_marker,
                end_marker,
            });
        }
        out
    }

    /// Reload flow: empty the rendered custom-track and custom-POI layers
    /// without removing them; the caller then calls `load` to repopulate.
    pub fn clear(
        &self,
        canvas: &mut MapCanvas,
        track_layer: LayerId,
        poi_layer: LayerId,
    ) -> Result<(), CanvasError> {
        canvas.clear_features(track_layer)?;
        canvas.clear_features(poi_layer)?;
        Ok(())
    }
}
