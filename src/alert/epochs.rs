//! Alert epoch transitions.
//!
//! An epoch runs from the first flood trigger at a location (or the first
//! trigger after a clear) until the alert is explicitly cleared.

use crate::model::{BlockHeight, FloodAlert, ReadingId};

/// How a flood trigger changed the alert for its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// No alert existed, or the previous one had been cleared.
    Started,
    /// The active alert's level went up by one.
    Escalated,
}

/// Computes the alert state after a flood-triggering reading.
///
/// Starting an epoch resets the level to 1 and stamps `start_time` with the
/// current height; escalating keeps the epoch's `start_time`.
pub fn next_alert(
    current: Option<&FloodAlert>,
    reading_id: ReadingId,
    block_height: BlockHeight,
) -> (FloodAlert, AlertTransition) {
    match current {
        Some(alert) if alert.is_active => (
            FloodAlert {
                alert_level: alert.alert_level + 1,
                start_time: alert.start_time,
                last_reading_id: reading_id,
                is_active: true,
            },
            AlertTransition::Escalated,
        ),
        _ => (
            FloodAlert {
                alert_level: 1,
                start_time: block_height,
                last_reading_id: reading_id,
                is_active: true,
            },
            AlertTransition::Started,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_starts_epoch() {
        let (alert, transition) = next_alert(None, 1, 100);
        assert_eq!(transition, AlertTransition::Started);
        assert_eq!(alert.alert_level, 1);
        assert_eq!(alert.start_time, 100);
        assert_eq!(alert.last_reading_id, 1);
        assert!(alert.is_active);
    }

    #[test]
    fn test_active_alert_escalates_and_keeps_start() {
        let (first, _) = next_alert(None, 1, 100);
        let (second, transition) = next_alert(Some(&first), 2, 105);
        assert_eq!(transition, AlertTransition::Escalated);
        assert_eq!(second.alert_level, 2);
        assert_eq!(second.start_time, 100);
        assert_eq!(second.last_reading_id, 2);
    }

    #[test]
    fn test_escalation_counts_past_u32_range() {
        let long_running = FloodAlert {
            alert_level: u64::from(u32::MAX),
            start_time: 100,
            last_reading_id: 9,
            is_active: true,
        };
        let (alert, _) = next_alert(Some(&long_running), 10, 200);
        assert_eq!(alert.alert_level, u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_cleared_alert_restarts_epoch() {
        let cleared = FloodAlert {
            alert_level: 4,
            start_time: 100,
            last_reading_id: 7,
            is_active: false,
        };
        let (alert, transition) = next_alert(Some(&cleared), 8, 140);
        assert_eq!(transition, AlertTransition::Started);
        assert_eq!(alert.alert_level, 1);
        assert_eq!(alert.start_time, 140);
        assert_eq!(alert.last_reading_id, 8);
    }
}
