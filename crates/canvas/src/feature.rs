use crate::style::FeatureStyle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u64);

/// Feature geometry in projected map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point([f64; 2]),
    Line(Vec<[f64; 2]>),
}

impl Geometry {
    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::Line(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub style: Option<FeatureStyle>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            style: None,
        }
    }

    pub fn styled(geometry: Geometry, style: FeatureStyle) -> Self {
        Self {
            geometry,
            style: Some(style),
        }
    }
}
