/// Axis-aligned extent in projected map coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extent {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Extent {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Extent { min, max }
    }

    /// Smallest extent containing all points. `None` for an empty slice.
    pub fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut out = Extent::new(*first, *first);
        for p in rest {
            out.expand(*p);
        }
        Some(out)
    }

    pub fn expand(&mut self, p: [f64; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

/// Four-sided view padding in pixels, ordered top/right/bottom/left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(v: f64) -> Self {
        Padding {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn from_array(p: [f64; 4]) -> Self {
        Padding {
            top: p[0],
            right: p[1],
            bottom: p[2],
            left: p[3],
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::{Extent, Padding};

    #[test]
    fn from_points_covers_all_vertices() {
        let e = Extent::from_points(&[[2.0, 3.0], [-1.0, 7.0], [5.0, 0.0]]).unwrap();
        assert_eq!(e.min, [-1.0, 0.0]);
        assert_eq!(e.max, [5.0, 7.0]);
        assert_eq!(e.center(), [2.0, 3.5]);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Extent::from_points(&[]).is_none());
    }

    #[test]
    fn padding_accessors() {
        let p = Padding::from_array([80.0, 80.0, 80.0, 80.0]);
        assert_eq!(p, Padding::uniform(80.0));
        assert_eq!(p.horizontal(), 160.0);
        assert_eq!(p.vertical(), 160.0);
        assert_eq!(Padding::ZERO.horizontal(), 0.0);
    }
}
