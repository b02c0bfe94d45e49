// libs/appointment-cell/src/services/conflict.rs
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::{BookedSlot, SchedulingError, Staff};
use shared_storage::SlotGuard;
use shared_utils::{end_of, overlaps, same_utc_day};

/// The capacity and overlap rules applied to one staff member's committed
/// bookings. Pure: callers hand it freshly read slots; nothing here is ever
/// cached between checks.
pub struct ConflictChecker;

impl ConflictChecker {
    /// Whether `staff` can take a booking at `start` for `duration_minutes`,
    /// judged against `slots`. `exclude` removes the appointment's own
    /// booking when rechecking a reschedule.
    ///
    /// Overlap is evaluated before capacity: a request colliding with an
    /// existing booking reports the collision even when the day is also full.
    pub fn check(
        staff: &Staff,
        slots: &[BookedSlot],
        start: DateTime<Utc>,
        duration_minutes: i64,
        exclude: Option<Uuid>,
    ) -> Result<(), SchedulingError> {
        let end = end_of(start, duration_minutes);
        let same_day: Vec<&BookedSlot> = slots
            .iter()
            .filter(|slot| Some(slot.appointment_id) != exclude)
            .filter(|slot| same_utc_day(slot.start_time, start))
            .collect();

        for slot in &same_day {
            if overlaps(slot.start_time, slot.end_time(), start, end) {
                return Err(SchedulingError::SchedulingConflict {
                    staff_id: staff.id,
                    staff_name: staff.name.clone(),
                });
            }
        }

        if same_day.len() as i32 >= staff.daily_capacity {
            return Err(SchedulingError::CapacityExceeded {
                staff_id: staff.id,
                staff_name: staff.name.clone(),
                booked: same_day.len(),
                capacity: staff.daily_capacity,
            });
        }

        Ok(())
    }

    /// The same rules packaged as a commit guard: the store re-reads the
    /// staff member's slots under its lock and runs this over them.
    pub fn guard(
        staff: &Staff,
        start: DateTime<Utc>,
        duration_minutes: i64,
        exclude: Option<Uuid>,
    ) -> SlotGuard {
        let staff = staff.clone();
        Box::new(move |slots| Self::check(&staff, slots, start, duration_minutes, exclude))
    }
}
