use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::debug;
use uuid::Uuid;

use shared_models::SchedulingError;
use shared_storage::SchedulingStore;
use shared_utils::utc_day;

use crate::models::StaffCandidate;

/// Answers "who could take this booking?". Produces annotated, pre-ordered
/// candidates; it never decides the assignment itself and an empty answer is
/// a normal outcome, not an error.
pub struct EligibilityService {
    store: Arc<dyn SchedulingStore>,
}

impl EligibilityService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Available staff whose `service_type` matches `required_type`, each
    /// annotated with their committed bookings, ordered by fewest bookings on
    /// `target_day` with names breaking ties.
    ///
    /// The annotations order the scan; any commit re-checks fresh slots under
    /// the store's lock, so stale annotations cannot double-book.
    pub async fn candidates(
        &self,
        account_id: Uuid,
        required_type: &str,
        target_day: NaiveDate,
    ) -> Result<Vec<StaffCandidate>, SchedulingError> {
        let staff = self
            .store
            .available_staff_by_type(account_id, required_type)
            .await?;
        debug!(
            "Found {} available staff for type '{}'",
            staff.len(),
            required_type
        );

        let lookups = staff.into_iter().map(|member| {
            let store = self.store.clone();
            async move {
                let booked = store.booked_slots(account_id, member.id).await?;
                let booked_on_target_day = booked
                    .iter()
                    .filter(|slot| utc_day(slot.start_time) == target_day)
                    .count();
                Ok::<_, SchedulingError>(StaffCandidate {
                    staff: member,
                    booked,
                    booked_on_target_day,
                })
            }
        });

        let mut candidates = join_all(lookups)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        candidates.sort_by(|a, b| {
            a.booked_on_target_day
                .cmp(&b.booked_on_target_day)
                .then_with(|| a.staff.name.cmp(&b.staff.name))
        });

        Ok(candidates)
    }
}
