use canvas::{CanvasError, LayerId, MapCanvas, TileSource};
use config::TileSourceConfig;

/// Ordered set of tile layers with single-active-layer visibility.
///
/// Exactly one layer is visible at any time; index 0 is active after a
/// build. `show_selector` tracks whether switching even makes sense.
#[derive(Debug, Default)]
pub struct TileLayerRegistry {
    layers: Vec<LayerId>,
    active: usize,
    panel_open: bool,
    show_selector: bool,
}

impl TileLayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one tile layer per descriptor, replacing any previous set.
    pub fn build(
        &mut self,
        canvas: &mut MapCanvas,
        descriptors: &[TileSourceConfig],
    ) -> Result<(), CanvasError> {
        for id in self.layers.drain(..) {
            canvas.remove_layer(id);
        }

        for (idx, desc) in descriptors.iter().enumerate() {
            let id = canvas.add_tile_layer(TileSource::new(
                desc.name.clone(),
                desc.url_template.clone(),
                desc.cache_tiles,
            ));
            canvas.set_visible(id, idx == 0)?;
            self.layers.push(id);
        }

        self.active = 0;
        self.panel_open = false;
        self.recompute_selector();
        Ok(())
    }

    /// Append one layer, keeping the current active layer visible.
    pub fn add(
        &mut self,
        canvas: &mut MapCanvas,
        desc: &TileSourceConfig,
    ) -> Result<LayerId, CanvasError> {
        let id = canvas.add_tile_layer(TileSource::new(
            desc.name.clone(),
            desc.url_template.clone(),
            desc.cache_tiles,
        ));
        canvas.set_visible(id, self.layers.is_empty())?;
        self.layers.push(id);
        self.recompute_selector();
        Ok(id)
    }

    /// Remove the layer at `idx`. If it was active, layer 0 becomes active.
    pub fn remove(&mut self, canvas: &mut MapCanvas, idx: usize) -> Result<(), CanvasError> {
        if idx >= self.layers.len() {
            return Ok(());
        }
        let id = self.layers.remove(idx);
        canvas.remove_layer(id);

        if !self.layers.is_empty() && idx == self.active {
            self.active = 0;
            self.apply_visibility(canvas)?;
        } else if idx < self.active {
            self.active -= 1;
        }
        self.recompute_selector();
        Ok(())
    }

    /// Select the layer at `idx` and toggle the selector panel.
    ///
    /// Re-selecting the active index only toggles the panel; the active
    /// layer and visibilities are untouched. Out-of-range indices are
    /// ignored entirely.
    pub fn select(&mut self, canvas: &mut MapCanvas, idx: usize) -> Result<(), CanvasError> {
        if idx >= self.layers.len() {
            return Ok(());
        }
        self.panel_open = !self.panel_open;
        if idx != self.active {
            self.active = idx;
            self.apply_visibility(canvas)?;
        }
        Ok(())
    }

    fn apply_visibility(&self, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        for (i, id) in self.layers.iter().enumerate() {
            canvas.set_visible(*id, i == self.active)?;
        }
        Ok(())
    }

    fn recompute_selector(&mut self) {
        self.show_selector = self.layers.len() > 1;
    }

    pub fn layer_ids(&self) -> &[LayerId] {
        &self.layers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn show_selector(&self) -> bool {
        self.show_selector
    }
}

#[cfg(test)]
mod tests {
    use super::TileLayerRegistry;
    use canvas::MapCanvas;
    use config::TileSourceConfig;

    fn descriptor(name: &str) -> TileSourceConfig {
        TileSourceConfig {
            name: name.to_string(),
            url_template: format!("https://{name}.test/{{z}}/{{x}}/{{y}}.png"),
            cache_tiles: 50_000,
        }
    }

    fn setup(count: usize) -> (MapCanvas, TileLayerRegistry) {
        let mut canvas = MapCanvas::new([1024.0, 768.0]);
        canvas.configure_view(6.0, 10.0, 18.0, "EPSG:3857");
        let mut registry = TileLayerRegistry::new();
        let descs: Vec<_> = (0..count).map(|i| descriptor(&format!("l{i}"))).collect();
        registry.build(&mut canvas, &descs).unwrap();
        (canvas, registry)
    }

    #[test]
    fn build_shows_only_the_first_layer() {
        let (canvas, registry) = setup(2);
        let ids = registry.layer_ids();
        assert_eq!(ids.len(), 2);
        assert!(canvas.is_visible(ids[0]));
        assert!(!canvas.is_visible(ids[1]));
        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn select_switches_visibility_exclusively() {
        let (mut canvas, mut registry) = setup(3);
        registry.select(&mut canvas, 2).unwrap();
        let ids = registry.layer_ids();
        assert!(!canvas.is_visible(ids[0]));
        assert!(!canvas.is_visible(ids[1]));
        assert!(canvas.is_visible(ids[2]));
        assert_eq!(registry.active_index(), 2);
    }

    #[test]
    fn reselecting_active_toggles_panel_only() {
        let (mut canvas, mut registry) = setup(2);
        registry.select(&mut canvas, 0).unwrap();
        assert!(registry.panel_open());
        assert_eq!(registry.active_index(), 0);
        registry.select(&mut canvas, 0).unwrap();
        assert!(!registry.panel_open());
        assert_eq!(registry.active_index(), 0);
        assert!(canvas.is_visible(registry.layer_ids()[0]));
    }

    #[test]
    fn selector_tracks_layer_count_across_add_remove() {
        let (mut canvas, mut registry) = setup(1);
        assert!(!registry.show_selector());

        registry.add(&mut canvas, &descriptor("extra")).unwrap();
        assert!(registry.show_selector());

        registry.remove(&mut canvas, 1).unwrap();
        assert!(!registry.show_selector());
    }

    #[test]
    fn removing_the_active_layer_falls_back_to_first() {
        let (mut canvas, mut registry) = setup(3);
        registry.select(&mut canvas, 2).unwrap();
        registry.remove(&mut canvas, 2).unwrap();
        assert_eq!(registry.active_index(), 0);
        assert!(canvas.is_visible(registry.layer_ids()[0]));
    }

    #[test]
    fn out_of_range_select_is_ignored() {
        let (mut canvas, mut registry) = setup(1);
        registry.select(&mut canvas, 5).unwrap();
        assert!(!registry.panel_open());
        assert_eq!(registry.active_index(), 0);
    }
}
