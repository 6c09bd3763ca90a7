use foundation::bounds::{Extent, Padding};
use foundation::proj::WORLD_SIZE;

/// Options for a single fit operation.
///
/// `zoom` pins the view to that zoom instead of deriving one from the extent
/// (used when refitting after a padding change must not rescale).
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub padding: Option<Padding>,
    pub duration_ms: u64,
    pub max_zoom: Option<f64>,
    pub zoom: Option<f64>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: None,
            duration_ms: 500,
            max_zoom: None,
            zoom: None,
        }
    }
}

/// The single view owned by the map. Center and rotation mutate over the
/// session; zoom bounds and projection are fixed at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub rotation_rad: f64,
    pub projection: String,
    pub viewport_px: [f64; 2],
}

impl View {
    pub fn new(
        min_zoom: f64,
        default_zoom: f64,
        max_zoom: f64,
        projection: impl Into<String>,
        viewport_px: [f64; 2],
    ) -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: default_zoom,
            min_zoom,
            max_zoom,
            rotation_rad: 0.0,
            projection: projection.into(),
            viewport_px,
        }
    }

    /// Center on `extent` and pick the zoom that fits it inside the viewport
    /// minus padding (or keep/pin the zoom the options dictate).
    pub fn fit(&mut self, extent: Extent, options: &FitOptions) {
        self.center = extent.center();

        let zoom = match options.zoom {
            Some(z) => z,
            None => {
                let pad = options.padding.unwrap_or(Padding::ZERO);
                let avail_w = (self.viewport_px[0] - pad.horizontal()).max(1.0);
                let avail_h = (self.viewport_px[1] - pad.vertical()).max(1.0);
                let res_w = extent.width() / avail_w;
                let res_h = extent.height() / avail_h;
                let resolution = res_w.max(res_h);
                if resolution > 0.0 {
                    (WORLD_SIZE / (256.0 * resolution)).log2()
                } else {
                    self.max_zoom
                }
            }
        };

        let upper = options.max_zoom.unwrap_or(self.max_zoom).min(self.max_zoom);
        self.zoom = zoom.clamp(self.min_zoom, upper);
    }
}
