#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

/// URL-templated tile source with a client-side tile cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    pub name: String,
    pub url_template: String,
    pub cache_tiles: usize,
}

impl TileSource {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>, cache_tiles: usize) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            cache_tiles,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Tile(TileSource),
    Vector,
}

#[cfg(test)]
mod tests {
    use super::TileSource;

    #[test]
    fn tile_source_keeps_template_verbatim() {
        let s = TileSource::new("base", "https://tiles.test/{z}/{x}/{y}.png", 50_000);
        assert_eq!(s.url_template, "https://tiles.test/{z}/{x}/{y}.png");
        assert_eq!(s.cache_tiles, 50_000);
    }
}
