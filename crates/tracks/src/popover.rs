use runtime::notice::kind;
use runtime::NoticeBus;

use crate::style::{AltitudeTier, StyleThreshold};

/// Single-slot transient text channel. Setting the slot to `None` retracts
/// the overlay; changes are notified, identical texts are not re-fired.
#[derive(Debug, Default)]
pub struct Popover {
    text: Option<String>,
}

impl Popover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: Option<String>, bus: &mut NoticeBus) {
        if self.text == text {
            return;
        }
        self.text = text;
        bus.emit(kind::OVERLAY, self.text.clone().unwrap_or_default());
    }

    pub fn update_altitude(
        &mut self,
        altitude: f64,
        thresholds: StyleThreshold,
        bus: &mut NoticeBus,
    ) {
        self.set(Some(altitude_message(altitude, thresholds)), bus);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Three fixed templates parameterized by the two threshold values.
pub fn altitude_message(altitude: f64, thresholds: StyleThreshold) -> String {
    match thresholds.classify(altitude) {
        AltitudeTier::Low => format!("Altitude below {} m", thresholds.orange),
        AltitudeTier::Mid => format!(
            "Altitude between {} m and {} m",
            thresholds.orange, thresholds.red
        ),
        AltitudeTier::High => format!("Altitude above {} m", thresholds.red),
    }
}

#[cfg(test)]
mod tests {
    use super::{altitude_message, Popover};
    use crate::style::StyleThreshold;
    use runtime::NoticeBus;

    #[test]
    fn mid_tier_message_interpolates_both_thresholds() {
        let t = StyleThreshold {
            orange: 800.0,
            red: 1500.0,
        };
        let msg = altitude_message(1000.0, t);
        assert!(msg.contains("800"));
        assert!(msg.contains("1500"));
        assert!(msg.starts_with("Altitude between"));
    }

    #[test]
    fn setting_none_retracts_the_overlay() {
        let mut p = Popover::new();
        let mut bus = NoticeBus::new();
        p.update_altitude(100.0, StyleThreshold::default(), &mut bus);
        assert!(p.text().is_some());

        p.set(None, &mut bus);
        assert_eq!(p.text(), None);
        assert_eq!(bus.notices().last().unwrap().message, "");
    }

    #[test]
    fn identical_text_is_not_renotified() {
        let mut p = Popover::new();
        let mut bus = NoticeBus::new();
        p.update_altitude(100.0, StyleThreshold::default(), &mut bus);
        p.update_altitude(200.0, StyleThreshold::default(), &mut bus);
        assert_eq!(bus.notices().len(), 1);
    }
}
