/// Paint for a line geometry: one color for the whole line, or one color per
/// vertex for gradient rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePaint {
    Solid(String),
    Gradient(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub paint: LinePaint,
    pub width: f64,
}

impl LineStyle {
    pub fn solid(color: impl Into<String>, width: f64) -> Self {
        Self {
            paint: LinePaint::Solid(color.into()),
            width,
        }
    }

    pub fn gradient(colors: Vec<String>, width: f64) -> Self {
        Self {
            paint: LinePaint::Gradient(colors),
            width,
        }
    }
}

/// Fixed circular marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStyle {
    Line(LineStyle),
    Marker(MarkerStyle),
}
