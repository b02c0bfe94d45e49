// libs/dashboard-cell/src/services/summary.rs
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::instrument;
use uuid::Uuid;

use shared_models::{ActivityLog, AppointmentFilter, AppointmentStatus, SchedulingError};
use shared_storage::SchedulingStore;
use shared_utils::utc_day;

use crate::models::{DashboardSummary, LoadLevel, StaffLoad};

/// Read-only rollups over the scheduling state. Nothing here mutates; the
/// numbers are a snapshot and may lag concurrent bookings by design of the
/// underlying reads.
pub struct DashboardService {
    store: Arc<dyn SchedulingStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// The day-at-a-glance summary: appointment counts for `day`, the
    /// account-wide queue depth, and per-staff load in name order.
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        account_id: Uuid,
        day: NaiveDate,
    ) -> Result<DashboardSummary, SchedulingError> {
        let todays = self
            .store
            .list_appointments(
                account_id,
                &AppointmentFilter {
                    day: Some(day),
                    ..Default::default()
                },
            )
            .await?;
        let waiting = self
            .store
            .waiting_appointments(account_id, None, None)
            .await?;
        let staff = self.store.list_staff(account_id).await?;

        // list_staff is already name-ordered; join_all keeps that order
        let loads = join_all(staff.into_iter().map(|member| {
            let store = self.store.clone();
            async move {
                let booked = store
                    .booked_slots(account_id, member.id)
                    .await?
                    .iter()
                    .filter(|slot| utc_day(slot.start_time) == day)
                    .count();
                Ok::<_, SchedulingError>(StaffLoad {
                    load: format!("{}/{}", booked, member.daily_capacity),
                    level: if booked as i32 >= member.daily_capacity {
                        LoadLevel::Booked
                    } else {
                        LoadLevel::Ok
                    },
                    staff_id: member.id,
                    name: member.name,
                    service_type: member.service_type,
                    status: member.status,
                    booked,
                    daily_capacity: member.daily_capacity,
                })
            }
        }))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let completed = todays
            .iter()
            .filter(|appointment| appointment.status == AppointmentStatus::Completed)
            .count();
        let pending = todays
            .iter()
            .filter(|appointment| {
                matches!(
                    appointment.status,
                    AppointmentStatus::Scheduled | AppointmentStatus::Waiting
                )
            })
            .count();

        Ok(DashboardSummary {
            date: day,
            total_today: todays.len(),
            completed,
            pending,
            waiting_queue: waiting.len(),
            staff_load: loads,
        })
    }

    /// The newest activity entries, for the dashboard's feed column.
    pub async fn activity_feed(
        &self,
        account_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ActivityLog>, SchedulingError> {
        self.store.recent_activity(account_id, limit).await
    }
}
