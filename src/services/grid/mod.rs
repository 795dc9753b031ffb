//! Slot quantization and wire-clock correction for the booking grid.
//!
//! Every pointer-driven time (drop position, resize edge, slot selection)
//! passes through `snap` before anything else sees it, so appointment
//! starts and durations are always multiples of the fixed 15-minute slot.

use chrono::{DateTime, Duration, Local, Utc};

/// Fixed quantization unit for the booking grid, in minutes.
pub const SLOT_MINUTES: i64 = 15;

/// Slot size in milliseconds.
pub const SLOT_MS: i64 = SLOT_MINUTES * 60 * 1000;

/// The clinic wall clock runs three hours ahead of the wire clock.
pub const CLINIC_UTC_OFFSET_HOURS: i64 = 3;

/// Round a timestamp to the nearest slot boundary, half-up on the
/// millisecond epoch. Idempotent.
pub fn snap(t: DateTime<Local>) -> DateTime<Local> {
    let ms = t.timestamp_millis();
    let snapped = (ms + SLOT_MS / 2).div_euclid(SLOT_MS) * SLOT_MS;
    DateTime::from_timestamp_millis(snapped)
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or(t)
}

/// Whether a timestamp sits exactly on a slot boundary.
pub fn is_slot_aligned(t: DateTime<Local>) -> bool {
    t.timestamp_millis().rem_euclid(SLOT_MS) == 0
}

/// Minutes between two endpoints after snapping both to the grid.
///
/// The result can be zero or negative; callers decide what a sub-slot
/// duration means (the scheduler rejects it before any network call).
pub fn duration_between(start: DateTime<Local>, end: DateTime<Local>) -> i64 {
    let start = snap(start);
    let end = snap(end);
    // both endpoints are slot-aligned, so this divides exactly
    (end.timestamp_millis() - start.timestamp_millis()) / 60_000
}

/// Shift a grid-local timestamp onto the wire clock for create/move/resize
/// requests.
///
/// The reverse conversion is never applied on read: the store returns
/// timestamps the engine already treats as grid-local. Write paths shift,
/// read paths do not. Keep it that way.
pub fn to_wire_time(local: DateTime<Local>) -> DateTime<Utc> {
    (local + Duration::hours(CLINIC_UTC_OFFSET_HOURS)).with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 11, h, m, 0).unwrap()
    }

    #[test]
    fn test_snap_rounds_down_below_half_slot() {
        assert_eq!(snap(local(10, 7)), local(10, 0));
    }

    #[test]
    fn test_snap_rounds_up_from_half_slot() {
        assert_eq!(snap(local(10, 8)), local(10, 15));
        // exactly 7.5 minutes past the boundary rounds up
        let mid = local(10, 7) + Duration::seconds(30);
        assert_eq!(snap(mid), local(10, 15));
    }

    #[test]
    fn test_snap_is_idempotent() {
        let once = snap(local(9, 41));
        assert_eq!(snap(once), once);
        assert!(is_slot_aligned(once));
    }

    #[test]
    fn test_snap_leaves_aligned_times_alone() {
        assert_eq!(snap(local(14, 45)), local(14, 45));
    }

    #[test]
    fn test_duration_between_snaps_both_endpoints() {
        // drop at 10:07-10:52 commits as 10:00 for 45 minutes
        assert_eq!(duration_between(local(10, 7), local(10, 52)), 45);
    }

    #[test]
    fn test_duration_between_collapsed_range() {
        assert_eq!(duration_between(local(10, 7), local(10, 9)), 0);
    }

    #[test]
    fn test_wire_time_shifts_forward_three_hours() {
        let t = local(9, 0);
        let wire = to_wire_time(t);
        assert_eq!(wire - t.with_timezone(&Utc), Duration::hours(3));
    }
}
