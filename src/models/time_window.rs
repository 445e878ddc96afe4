//! Time window type.

use serde::{Deserialize, Serialize};

/// A service-start window at a location, in model time units.
///
/// Service may begin no earlier than `earliest` and no later than `latest`;
/// it may therefore end after `latest`.
///
/// # Examples
///
/// ```
/// use cp_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(100, 200).unwrap();
/// assert!(tw.contains(150));
/// assert!(!tw.contains(250));
/// assert_eq!(tw.end_max(30), 230);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    earliest: i64,
    latest: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `earliest > latest`.
    pub fn new(earliest: i64, latest: i64) -> Option<Self> {
        if earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    /// Earliest allowed service start.
    pub fn earliest(&self) -> i64 {
        self.earliest
    }

    /// Returns `true` if service may start at the given time.
    pub fn contains(&self, start: i64) -> bool {
        start >= self.earliest && start <= self.latest
    }

    /// Latest allowed service end for a service of the given duration.
    pub fn end_max(&self, duration: i64) -> i64 {
        self.latest + duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.earliest(), 10);
        assert_eq!(tw.end_max(0), 20);
        assert!(TimeWindow::new(5, 5).is_some());
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert!(tw.contains(10));
        assert!(tw.contains(20));
        assert!(!tw.contains(9));
        assert!(!tw.contains(21));
    }
}
