use chrono::{NaiveTime, SubsecRound};

use crate::database::models::AttendanceStatus;

/// Thresholds that turn raw check-in/check-out instants into a status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendancePolicy {
    /// Check-ins strictly after this local time are late.
    pub late_after: NaiveTime,
    /// Worked hours strictly below this make an on-time day a half-day.
    pub half_day_hours: f64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_after: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            half_day_hours: 4.0,
        }
    }
}

impl AttendancePolicy {
    /// Compared in whole seconds: the whole threshold second is on time.
    pub fn is_late(&self, local_time: NaiveTime) -> bool {
        local_time.trunc_subsecs(0) > self.late_after
    }

    pub fn check_in_status(&self, local_time: NaiveTime) -> AttendanceStatus {
        if self.is_late(local_time) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }

    /// Status after check-out. Late is never downgraded to half-day.
    pub fn check_out_status(&self, current: AttendanceStatus, hours: f64) -> AttendanceStatus {
        if hours < self.half_day_hours && current != AttendanceStatus::Late {
            AttendanceStatus::HalfDay
        } else {
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn nine_thirty_is_on_time() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_in_status(at(9, 30, 0)), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(at(8, 0, 0)), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(at(0, 0, 0)), AttendanceStatus::Present);
    }

    #[test]
    fn after_nine_thirty_is_late() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_in_status(at(9, 31, 0)), AttendanceStatus::Late);
        assert_eq!(policy.check_in_status(at(9, 45, 0)), AttendanceStatus::Late);
        assert_eq!(policy.check_in_status(at(10, 0, 0)), AttendanceStatus::Late);
        assert_eq!(policy.check_in_status(at(23, 59, 59)), AttendanceStatus::Late);
    }

    #[test]
    fn first_second_past_threshold_is_late() {
        let policy = AttendancePolicy::default();
        assert!(!policy.is_late(at(9, 30, 0)));
        assert!(policy.is_late(at(9, 30, 1)));
        assert!(policy.is_late(at(9, 31, 0)));
    }

    #[test]
    fn fractions_of_the_threshold_second_are_on_time() {
        let policy = AttendancePolicy::default();
        let within = NaiveTime::from_hms_milli_opt(9, 30, 0, 400).unwrap();
        let last = NaiveTime::from_hms_milli_opt(9, 30, 0, 999).unwrap();
        let next = NaiveTime::from_hms_milli_opt(9, 30, 1, 1).unwrap();

        assert_eq!(policy.check_in_status(within), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(last), AttendanceStatus::Present);
        assert_eq!(policy.check_in_status(next), AttendanceStatus::Late);
    }

    #[test]
    fn short_on_time_day_becomes_half_day() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Present, 3.5),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Present, 3.99),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Present, 4.0),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn late_wins_over_half_day() {
        let policy = AttendancePolicy::default();
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Late, 1.25),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn custom_threshold() {
        let policy = AttendancePolicy {
            late_after: at(10, 0, 0),
            half_day_hours: 5.0,
        };
        assert!(!policy.is_late(at(9, 45, 0)));
        assert!(policy.is_late(at(10, 1, 0)));
        assert_eq!(
            policy.check_out_status(AttendanceStatus::Present, 4.5),
            AttendanceStatus::HalfDay
        );
    }
}
