use canvas::LineStyle;

pub const TRACK_WIDTH: f64 = 4.0;

pub const TIER_LOW_COLOR: &str = "#2e7d32";
pub const TIER_MID_COLOR: &str = "#ff9800";
pub const TIER_HIGH_COLOR: &str = "#f44336";

/// Altitude thresholds (meters) splitting a track into three tiers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleThreshold {
    pub orange: f64,
    pub red: f64,
}

impl Default for StyleThreshold {
    fn default() -> Self {
        Self {
            orange: 800.0,
            red: 1500.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AltitudeTier {
    Low,
    Mid,
    High,
}

impl StyleThreshold {
    /// Partition is exhaustive and non-overlapping:
    /// `a < orange` low, `orange <= a < red` mid, `a >= red` high.
    pub fn classify(&self, altitude: f64) -> AltitudeTier {
        if altitude < self.orange {
            AltitudeTier::Low
        } else if altitude < self.red {
            AltitudeTier::Mid
        } else {
            AltitudeTier::High
        }
    }
}

pub fn tier_color(tier: AltitudeTier) -> &'static str {
    match tier {
        AltitudeTier::Low => TIER_LOW_COLOR,
        AltitudeTier::Mid => TIER_MID_COLOR,
        AltitudeTier::High => TIER_HIGH_COLOR,
    }
}

/// Line style for a track: a per-vertex gradient in flow-line mode, a solid
/// stroke otherwise. Vertices beyond the last altitude sample reuse it.
pub fn line_style(
    color: &str,
    altitudes: &[f64],
    thresholds: StyleThreshold,
    flow_line: bool,
    vertex_count: usize,
) -> LineStyle {
    if flow_line && !altitudes.is_empty() {
        let colors = (0..vertex_count)
            .map(|i| {
                let alt = altitudes
                    .get(i)
                    .or_else(|| altitudes.last())
                    .copied()
                    .unwrap_or(0.0);
                tier_color(thresholds.classify(alt)).to_string()
            })
            .collect();
        LineStyle::gradient(colors, TRACK_WIDTH)
    } else {
        LineStyle::solid(color, TRACK_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::{line_style, AltitudeTier, StyleThreshold, TIER_HIGH_COLOR, TIER_LOW_COLOR, TIER_MID_COLOR};
    use canvas::LinePaint;

    #[test]
    fn boundaries_are_half_open() {
        let t = StyleThreshold::default();
        assert_eq!(t.classify(799.999), AltitudeTier::Low);
        assert_eq!(t.classify(800.0), AltitudeTier::Mid);
        assert_eq!(t.classify(1499.999), AltitudeTier::Mid);
        assert_eq!(t.classify(1500.0), AltitudeTier::High);
        assert_eq!(t.classify(f64::NEG_INFINITY), AltitudeTier::Low);
        assert_eq!(t.classify(f64::INFINITY), AltitudeTier::High);
    }

    #[test]
    fn gradient_colors_follow_per_vertex_altitude() {
        let style = line_style(
            "#caaf15",
            &[100.0, 900.0, 2000.0],
            StyleThreshold::default(),
            true,
            3,
        );
        match style.paint {
            LinePaint::Gradient(colors) => {
                assert_eq!(colors, vec![TIER_LOW_COLOR, TIER_MID_COLOR, TIER_HIGH_COLOR]);
            }
            LinePaint::Solid(_) => panic!("expected a gradient"),
        }
    }

    #[test]
    fn missing_samples_reuse_the_last_altitude() {
        let style = line_style("#caaf15", &[2000.0], StyleThreshold::default(), true, 3);
        match style.paint {
            LinePaint::Gradient(colors) => {
                assert_eq!(colors, vec![TIER_HIGH_COLOR; 3]);
            }
            LinePaint::Solid(_) => panic!("expected a gradient"),
        }
    }

    #[test]
    fn flat_mode_is_a_solid_stroke() {
        let style = line_style("#123456", &[100.0], StyleThreshold::default(), false, 5);
        assert_eq!(style.paint, LinePaint::Solid("#123456".to_string()));
    }
}
