//! Seat accounting for trainings.

use serde::Serialize;

use crate::domain::types::SlotCount;

/// Derived view of a training's seat usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    pub max_registrations: i32,
    pub available_slots: i32,
}

impl Capacity {
    pub fn new(max_registrations: SlotCount, available_slots: SlotCount) -> Self {
        Self {
            max_registrations: max_registrations.get(),
            available_slots: available_slots.get(),
        }
    }

    /// Seats already taken.
    pub fn enrolled(&self) -> i32 {
        self.max_registrations - self.available_slots
    }

    /// Percentage of seats taken, rounded to the nearest integer.
    ///
    /// A training without capacity reports 0.
    pub fn fill_rate(&self) -> i32 {
        if self.max_registrations <= 0 {
            return 0;
        }
        let rate = f64::from(self.enrolled()) / f64::from(self.max_registrations) * 100.0;
        rate.round() as i32
    }

    pub fn is_full(&self) -> bool {
        self.available_slots <= 0
    }
}

/// Registration flag to persist for a training being saved.
///
/// Zero free slots force the flag off. The rule never reopens registration.
pub fn registration_open_after_save(available_slots: SlotCount, submitted: bool) -> bool {
    if available_slots.get() <= 0 {
        false
    } else {
        submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(max: i32, available: i32) -> Capacity {
        Capacity::new(SlotCount::new(max).unwrap(), SlotCount::new(available).unwrap())
    }

    #[test]
    fn fill_rate_handles_zero_capacity() {
        assert_eq!(capacity(0, 0).fill_rate(), 0);
    }

    #[test]
    fn fill_rate_boundaries() {
        assert_eq!(capacity(10, 10).fill_rate(), 0);
        assert_eq!(capacity(10, 0).fill_rate(), 100);
        assert_eq!(capacity(3, 1).fill_rate(), 67);
    }

    #[test]
    fn enrolled_is_max_minus_available() {
        let c = capacity(25, 7);
        assert_eq!(c.enrolled(), 18);
        assert!(!c.is_full());
        assert!(capacity(25, 0).is_full());
    }

    #[test]
    fn zero_slots_force_registration_closed() {
        let zero = SlotCount::new(0).unwrap();
        assert!(!registration_open_after_save(zero, true));
        assert!(!registration_open_after_save(zero, false));
    }

    #[test]
    fn free_slots_keep_submitted_flag() {
        let five = SlotCount::new(5).unwrap();
        assert!(registration_open_after_save(five, true));
        assert!(!registration_open_after_save(five, false));
    }
}
