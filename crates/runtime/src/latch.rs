/// One-shot readiness latch.
///
/// `try_fire` succeeds exactly once; the latch stays satisfied until `reset`
/// starts a new initialization cycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OneShotLatch {
    fired: bool,
}

impl OneShotLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::OneShotLatch;

    #[test]
    fn fires_exactly_once_per_cycle() {
        let mut latch = OneShotLatch::new();
        assert!(latch.try_fire());
        assert!(!latch.try_fire());
        assert!(latch.is_fired());

        latch.reset();
        assert!(latch.try_fire());
    }
}
