/// Last-value cache that reports only genuine changes.
///
/// `update` returns the new value when it differs from the cached one, so
/// callers can notify without re-firing identical values.
#[derive(Debug)]
pub struct ObservedValue<T> {
    last: Option<T>,
}

impl<T> Default for ObservedValue<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq> ObservedValue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: T) -> Option<&T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value);
        self.last.as_ref()
    }

    pub fn get(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::ObservedValue;

    #[test]
    fn first_update_always_reports() {
        let mut v = ObservedValue::new();
        assert_eq!(v.update(42), Some(&42));
    }

    #[test]
    fn redundant_updates_do_not_report() {
        let mut v = ObservedValue::new();
        v.update(7);
        assert_eq!(v.update(7), None);
        assert_eq!(v.update(8), Some(&8));
        assert_eq!(v.get(), Some(&8));
    }
}
