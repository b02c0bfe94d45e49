// libs/shared/storage/src/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    ActivityLog, Appointment, AppointmentFilter, AppointmentPatch, AppointmentStatus,
    AppointmentWrite, BookedSlot, NewActivityLog, SchedulingError, Service, Staff, StaffStatus,
};
use shared_utils::utc_day;

use crate::store::{SchedulingStore, SlotGuard};

#[derive(Default)]
struct StoreState {
    services: HashMap<Uuid, Service>,
    staff: HashMap<Uuid, Staff>,
    appointments: HashMap<Uuid, Appointment>,
    activity: Vec<ActivityLog>,
}

impl StoreState {
    /// Committed bookings of one staff member, durations resolved through the
    /// services table. Soft-deleted services still resolve; a dangling
    /// service reference falls back to the configured default duration.
    fn slots_for(&self, account_id: Uuid, staff_id: Uuid, fallback_minutes: i64) -> Vec<BookedSlot> {
        let mut slots: Vec<BookedSlot> = self
            .appointments
            .values()
            .filter(|a| {
                a.account_id == account_id
                    && a.staff_id == Some(staff_id)
                    && a.status == AppointmentStatus::Scheduled
            })
            .map(|a| BookedSlot {
                appointment_id: a.id,
                start_time: a.start_time,
                duration_minutes: self
                    .services
                    .get(&a.service_id)
                    .map(|s| s.duration_minutes)
                    .unwrap_or(fallback_minutes),
            })
            .collect();
        slots.sort_by_key(|s| s.start_time);
        slots
    }

    /// Patches the row only while it still holds `expected_status`. The
    /// caller decided on a status it read earlier; a row that transitioned
    /// since then must not be overwritten.
    fn patch_if_status(
        &mut self,
        account_id: Uuid,
        appointment_id: Uuid,
        expected_status: AppointmentStatus,
        patch: &AppointmentPatch,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self
            .appointments
            .get_mut(&appointment_id)
            .filter(|a| a.account_id == account_id)
            .ok_or_else(|| SchedulingError::NotFound("Appointment not found".to_string()))?;
        if appointment.status != expected_status {
            return Err(SchedulingError::InvalidRequest(format!(
                "Appointment is no longer {}",
                expected_status
            )));
        }
        Self::apply_patch(appointment, patch);
        Ok(appointment.clone())
    }

    fn apply_patch(appointment: &mut Appointment, patch: &AppointmentPatch) {
        if let Some(name) = &patch.customer_name {
            appointment.customer_name = name.clone();
        }
        if let Some(phone) = &patch.customer_phone {
            appointment.customer_phone = Some(phone.clone());
        }
        if let Some(email) = &patch.customer_email {
            appointment.customer_email = Some(email.clone());
        }
        if let Some(service_id) = patch.service_id {
            appointment.service_id = service_id;
        }
        if let Some(staff_id) = patch.staff_id {
            appointment.staff_id = staff_id;
        }
        if let Some(start_time) = patch.start_time {
            appointment.start_time = start_time;
        }
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        appointment.updated_at = Utc::now();
    }
}

/// In-memory `SchedulingStore` used by the tests and the demo binary.
///
/// A single mutex serializes all access, which is a coarser scope than the
/// per-staff bound `commit_scheduled` requires but never a weaker one.
pub struct MemoryStore {
    state: Mutex<StoreState>,
    fallback_duration_minutes: i64,
}

impl MemoryStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            fallback_duration_minutes: config.fallback_service_duration_minutes,
        }
    }
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn service_by_id(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Service>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .services
            .get(&service_id)
            .filter(|s| s.account_id == account_id)
            .cloned())
    }

    async fn list_services(
        &self,
        account_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<Service>, SchedulingError> {
        let state = self.state.lock().await;
        let mut services: Vec<Service> = state
            .services
            .values()
            .filter(|s| s.account_id == account_id && (include_deleted || !s.is_deleted))
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn insert_service(&self, service: Service) -> Result<Service, SchedulingError> {
        let mut state = self.state.lock().await;
        state.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn mark_service_deleted(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Service, SchedulingError> {
        let mut state = self.state.lock().await;
        let service = state
            .services
            .get_mut(&service_id)
            .filter(|s| s.account_id == account_id)
            .ok_or_else(|| SchedulingError::NotFound("Service not found".to_string()))?;
        service.is_deleted = true;
        service.updated_at = Utc::now();
        Ok(service.clone())
    }

    async fn staff_by_id(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Option<Staff>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .staff
            .get(&staff_id)
            .filter(|s| s.account_id == account_id)
            .cloned())
    }

    async fn list_staff(&self, account_id: Uuid) -> Result<Vec<Staff>, SchedulingError> {
        let state = self.state.lock().await;
        let mut staff: Vec<Staff> = state
            .staff
            .values()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    async fn available_staff_by_type(
        &self,
        account_id: Uuid,
        service_type: &str,
    ) -> Result<Vec<Staff>, SchedulingError> {
        let state = self.state.lock().await;
        let mut staff: Vec<Staff> = state
            .staff
            .values()
            .filter(|s| {
                s.account_id == account_id
                    && s.status == StaffStatus::Available
                    && s.service_type == service_type
            })
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    async fn insert_staff(&self, staff: Staff) -> Result<Staff, SchedulingError> {
        let mut state = self.state.lock().await;
        state.staff.insert(staff.id, staff.clone());
        Ok(staff)
    }

    async fn update_staff_status(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        status: StaffStatus,
    ) -> Result<Staff, SchedulingError> {
        let mut state = self.state.lock().await;
        let staff = state
            .staff
            .get_mut(&staff_id)
            .filter(|s| s.account_id == account_id)
            .ok_or_else(|| SchedulingError::NotFound("Staff not found".to_string()))?;
        staff.status = status;
        staff.updated_at = Utc::now();
        Ok(staff.clone())
    }

    async fn appointment_by_id(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .appointments
            .get(&appointment_id)
            .filter(|a| a.account_id == account_id)
            .cloned())
    }

    async fn list_appointments(
        &self,
        account_id: Uuid,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let state = self.state.lock().await;
        let search = filter
            .search_term
            .as_ref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.account_id == account_id)
            .filter(|a| filter.day.map_or(true, |day| utc_day(a.start_time) == day))
            .filter(|a| filter.staff_id.map_or(true, |id| a.staff_id == Some(id)))
            .filter(|a| filter.status.map_or(true, |status| a.status == status))
            .filter(|a| {
                search
                    .as_ref()
                    .map_or(true, |term| a.customer_name.to_lowercase().contains(term))
            })
            .cloned()
            .collect();

        // Chronological on a specific day, newest first otherwise
        if filter.day.is_some() {
            appointments.sort_by_key(|a| a.start_time);
        } else {
            appointments.sort_by_key(|a| std::cmp::Reverse(a.start_time));
        }
        Ok(appointments)
    }

    async fn booked_slots(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<BookedSlot>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state.slots_for(account_id, staff_id, self.fallback_duration_minutes))
    }

    async fn waiting_appointments(
        &self,
        account_id: Uuid,
        staff_type: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let state = self.state.lock().await;
        let mut waiting: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.account_id == account_id && a.status == AppointmentStatus::Waiting)
            .filter(|a| {
                staff_type.map_or(true, |wanted| {
                    state
                        .services
                        .get(&a.service_id)
                        .is_some_and(|s| s.required_staff_type == wanted)
                })
            })
            .cloned()
            .collect();
        waiting.sort_by_key(|a| a.start_time);
        if let Some(limit) = limit {
            waiting.truncate(limit);
        }
        Ok(waiting)
    }

    async fn recent_activity(
        &self,
        account_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ActivityLog>, SchedulingError> {
        let state = self.state.lock().await;
        let mut entries: Vec<ActivityLog> = state
            .activity
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn insert_appointment(
        &self,
        appointment: Appointment,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError> {
        let mut state = self.state.lock().await;
        state.appointments.insert(appointment.id, appointment.clone());
        state.activity.push(log.into_log());
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
        expected_status: AppointmentStatus,
        patch: AppointmentPatch,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError> {
        let mut state = self.state.lock().await;
        let updated = state.patch_if_status(account_id, appointment_id, expected_status, &patch)?;
        state.activity.push(log.into_log());
        Ok(updated)
    }

    async fn commit_scheduled(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        guard: SlotGuard,
        write: AppointmentWrite,
        log: NewActivityLog,
    ) -> Result<Appointment, SchedulingError> {
        let mut state = self.state.lock().await;

        if !state
            .staff
            .get(&staff_id)
            .is_some_and(|s| s.account_id == account_id)
        {
            return Err(SchedulingError::NotFound("Staff not found".to_string()));
        }

        // Fresh read under the lock, then the guard decides
        let slots = state.slots_for(account_id, staff_id, self.fallback_duration_minutes);
        guard(&slots)?;

        let committed = match write {
            AppointmentWrite::Insert(appointment) => {
                state.appointments.insert(appointment.id, appointment.clone());
                appointment
            }
            AppointmentWrite::Update {
                appointment_id,
                expected_status,
                patch,
            } => state.patch_if_status(account_id, appointment_id, expected_status, &patch)?,
        };

        state.activity.push(log.into_log());
        debug!(
            "Committed appointment {} to staff {} under guard",
            committed.id, staff_id
        );
        Ok(committed)
    }
}
