// libs/appointment-cell/src/services/booking.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    ActivityAction, Appointment, AppointmentFilter, AppointmentPatch, AppointmentStatus,
    AppointmentWrite, NewActivityLog, SchedulingError, Service, Staff,
};
use shared_storage::SchedulingStore;
use shared_utils::{end_of, same_utc_day, utc_day};
use staff_cell::EligibilityService;

use crate::models::{AppointmentView, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::assignment::AssignmentService;
use crate::services::conflict::ConflictChecker;
use crate::services::promoter::QueuePromoterService;

fn scheduled_message(customer_name: &str, staff_name: &str, booked: usize, capacity: i32) -> String {
    format!(
        "Appointment for \"{}\" scheduled with {} ({}/{})",
        customer_name, staff_name, booked, capacity
    )
}

/// Owns every appointment lifecycle transition: create, update, cancel.
///
/// Creation either binds the appointment to a staff member through the
/// first-fit selector, honours an explicitly pinned staff member, or places
/// the appointment in the waiting queue. Updates re-run the capacity and
/// overlap rules whenever the final assignment could have changed, and any
/// transition that frees committed capacity kicks off a promotion pass for
/// the freed staff member's service type.
pub struct AppointmentBookingService {
    store: Arc<dyn SchedulingStore>,
    eligibility: EligibilityService,
    assignment: AssignmentService,
    promoter: QueuePromoterService,
    fallback_duration_minutes: i64,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn SchedulingStore>, config: &AppConfig) -> Self {
        Self {
            eligibility: EligibilityService::new(store.clone()),
            assignment: AssignmentService::new(store.clone()),
            promoter: QueuePromoterService::new(store.clone(), config),
            fallback_duration_minutes: config.fallback_service_duration_minutes,
            store,
        }
    }

    /// The queue promoter wired to the same store, for callers that trigger
    /// passes outside a lifecycle transition.
    pub fn promoter(&self) -> &QueuePromoterService {
        &self.promoter
    }

    // ===== Create =====

    /// Books a new appointment. Without a pinned staff member the engine
    /// picks the least-loaded eligible candidate; if nobody can take the
    /// slot the appointment lands in the waiting queue instead of failing.
    /// A pinned staff member that cannot take the slot is an error.
    #[instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create_appointment(
        &self,
        account_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        if request.customer_name.trim().is_empty() {
            return Err(SchedulingError::InvalidRequest(
                "Customer name is required".to_string(),
            ));
        }
        let service = self
            .resolve_bookable_service(account_id, request.service_id)
            .await?;

        if let Some(staff_id) = request.staff_id {
            return self
                .create_with_pinned_staff(account_id, request, &service, staff_id)
                .await;
        }

        let candidates = self
            .eligibility
            .candidates(
                account_id,
                &service.required_staff_type,
                utc_day(request.start_time),
            )
            .await?;

        let base = Self::new_appointment_row(account_id, &request);
        let outcome = self
            .assignment
            .assign_first_fit(
                account_id,
                &candidates,
                request.start_time,
                service.duration_minutes,
                None,
                |candidate| {
                    let mut row = base.clone();
                    row.staff_id = Some(candidate.staff.id);
                    row.status = AppointmentStatus::Scheduled;
                    AppointmentWrite::Insert(row)
                },
                |candidate| NewActivityLog {
                    account_id,
                    staff_id: Some(candidate.staff.id),
                    appointment_id: Some(base.id),
                    message: scheduled_message(
                        &base.customer_name,
                        &candidate.staff.name,
                        candidate.booked_on_target_day + 1,
                        candidate.staff.daily_capacity,
                    ),
                    action: ActivityAction::Create,
                },
            )
            .await?;

        match outcome {
            Some(outcome) => {
                info!(
                    "Appointment {} scheduled with {}",
                    outcome.appointment.id, outcome.staff.name
                );
                Ok(outcome.appointment)
            }
            None => self.place_in_queue(account_id, base).await,
        }
    }

    /// The caller named the staff member, so capacity and conflict failures
    /// surface as errors instead of falling back to the queue.
    async fn create_with_pinned_staff(
        &self,
        account_id: Uuid,
        request: CreateAppointmentRequest,
        service: &Service,
        staff_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let staff = self
            .validate_assignable_staff(account_id, staff_id, service)
            .await?;

        // fail fast on current state; the guard re-decides on fresh slots
        let slots = self.store.booked_slots(account_id, staff.id).await?;
        ConflictChecker::check(
            &staff,
            &slots,
            request.start_time,
            service.duration_minutes,
            None,
        )?;
        let booked_today = slots
            .iter()
            .filter(|slot| same_utc_day(slot.start_time, request.start_time))
            .count();

        let mut row = Self::new_appointment_row(account_id, &request);
        row.staff_id = Some(staff.id);
        row.status = AppointmentStatus::Scheduled;

        let guard = ConflictChecker::guard(
            &staff,
            request.start_time,
            service.duration_minutes,
            None,
        );
        let log = NewActivityLog {
            account_id,
            staff_id: Some(staff.id),
            appointment_id: Some(row.id),
            message: scheduled_message(
                &row.customer_name,
                &staff.name,
                booked_today + 1,
                staff.daily_capacity,
            ),
            action: ActivityAction::Create,
        };

        let appointment = self
            .store
            .commit_scheduled(
                account_id,
                staff.id,
                guard,
                AppointmentWrite::Insert(row),
                log,
            )
            .await?;
        info!(
            "Appointment {} scheduled with pinned staff {}",
            appointment.id, staff.name
        );
        Ok(appointment)
    }

    async fn place_in_queue(
        &self,
        account_id: Uuid,
        row: Appointment,
    ) -> Result<Appointment, SchedulingError> {
        let log = NewActivityLog {
            account_id,
            staff_id: None,
            appointment_id: Some(row.id),
            message: format!(
                "Appointment for \"{}\" added to waiting queue (no available staff at selected time)",
                row.customer_name
            ),
            action: ActivityAction::Queue,
        };
        let queued = self.store.insert_appointment(row, log).await?;
        info!("Appointment {} placed in waiting queue", queued.id);
        Ok(queued)
    }

    // ===== Update =====

    /// Applies a partial update. A terminal status override short-circuits
    /// all assignment logic and may only travel with contact-field edits;
    /// otherwise the final staff assignment is re-validated against capacity
    /// and overlap rules, excluding the appointment's own current booking.
    pub async fn update_appointment(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        if request.is_empty() {
            return Err(SchedulingError::InvalidRequest(
                "Nothing to update".to_string(),
            ));
        }
        if let Some(name) = &request.customer_name {
            if name.trim().is_empty() {
                return Err(SchedulingError::InvalidRequest(
                    "Customer name cannot be empty".to_string(),
                ));
            }
        }

        let existing = self
            .store
            .appointment_by_id(account_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("Appointment not found".to_string()))?;
        if existing.status.is_terminal() {
            return Err(SchedulingError::InvalidRequest(format!(
                "Appointment is already {}",
                existing.status
            )));
        }

        let display_name = request
            .customer_name
            .as_deref()
            .unwrap_or(&existing.customer_name);

        let updated = if let Some(status) = request.status {
            self.apply_status_override(account_id, &existing, &request, status, display_name)
                .await?
        } else {
            self.apply_reschedule(account_id, &existing, &request, display_name)
                .await?
        };

        // a Scheduled slot that stopped being held frees capacity
        let previously_held =
            (existing.status == AppointmentStatus::Scheduled).then_some(existing.staff_id).flatten();
        let now_held =
            (updated.status == AppointmentStatus::Scheduled).then_some(updated.staff_id).flatten();
        if let Some(freed) = previously_held {
            if now_held != Some(freed) {
                self.promote_for_staff(account_id, freed).await;
            }
        }

        Ok(updated)
    }

    /// Terminal overrides skip every capacity check and retain the staff
    /// reference as history. Rescheduling fields in the same request would
    /// contradict the override, so they are rejected outright.
    async fn apply_status_override(
        &self,
        account_id: Uuid,
        existing: &Appointment,
        request: &UpdateAppointmentRequest,
        status: AppointmentStatus,
        display_name: &str,
    ) -> Result<Appointment, SchedulingError> {
        if !status.is_terminal() {
            return Err(SchedulingError::InvalidRequest(
                "Status can only be overridden to completed, cancelled or no_show".to_string(),
            ));
        }
        if request.staff_id.is_some() || request.service_id.is_some() || request.start_time.is_some()
        {
            return Err(SchedulingError::InvalidRequest(
                "A status override cannot be combined with rescheduling changes".to_string(),
            ));
        }

        let mut patch = Self::patch_from(request);
        patch.status = Some(status);
        let log = NewActivityLog {
            account_id,
            staff_id: existing.staff_id,
            appointment_id: Some(existing.id),
            message: format!("Appointment for \"{}\" marked {}", display_name, status),
            action: ActivityAction::Update,
        };
        let updated = self
            .store
            .update_appointment(account_id, existing.id, existing.status, patch, log)
            .await?;
        info!("Appointment {} marked {}", existing.id, status);
        Ok(updated)
    }

    async fn apply_reschedule(
        &self,
        account_id: Uuid,
        existing: &Appointment,
        request: &UpdateAppointmentRequest,
        display_name: &str,
    ) -> Result<Appointment, SchedulingError> {
        let final_staff_id = match request.staff_id {
            None => existing.staff_id,
            Some(choice) => choice,
        };
        let staff_changed = final_staff_id != existing.staff_id;
        let start_changed =
            request.start_time.is_some() && request.start_time != Some(existing.start_time);
        let service_changed =
            request.service_id.is_some() && request.service_id != Some(existing.service_id);
        let final_service_id = request.service_id.unwrap_or(existing.service_id);
        let final_start = request.start_time.unwrap_or(existing.start_time);

        if let (Some(staff_id), true) =
            (final_staff_id, staff_changed || start_changed || service_changed)
        {
            // the assignment could have changed, re-run the full check with
            // the appointment's own booking excluded from the conflict set
            let service = self
                .resolve_bookable_service(account_id, final_service_id)
                .await?;
            let staff = self
                .validate_assignable_staff(account_id, staff_id, &service)
                .await?;

            let mut patch = Self::patch_from(request);
            patch.status = Some(AppointmentStatus::Scheduled);
            let guard = ConflictChecker::guard(
                &staff,
                final_start,
                service.duration_minutes,
                Some(existing.id),
            );
            let log = NewActivityLog {
                account_id,
                staff_id: Some(staff.id),
                appointment_id: Some(existing.id),
                message: format!(
                    "Appointment for \"{}\" updated ({})",
                    display_name,
                    Self::describe_changes(request)
                ),
                action: ActivityAction::Update,
            };
            let updated = self
                .store
                .commit_scheduled(
                    account_id,
                    staff.id,
                    guard,
                    AppointmentWrite::Update {
                        appointment_id: existing.id,
                        expected_status: existing.status,
                        patch,
                    },
                    log,
                )
                .await?;
            info!("Appointment {} rescheduled with {}", existing.id, staff.name);
            return Ok(updated);
        }

        if service_changed {
            // still validated even though no staff re-check follows
            self.resolve_bookable_service(account_id, final_service_id)
                .await?;
        }

        let unassigned = final_staff_id.is_none() && existing.staff_id.is_some();
        let mut patch = Self::patch_from(request);
        let message = if unassigned {
            patch.status = Some(AppointmentStatus::Waiting);
            format!(
                "Appointment for \"{}\" returned to waiting queue",
                display_name
            )
        } else {
            format!(
                "Appointment for \"{}\" updated ({})",
                display_name,
                Self::describe_changes(request)
            )
        };
        let log = NewActivityLog {
            account_id,
            staff_id: final_staff_id.or(existing.staff_id),
            appointment_id: Some(existing.id),
            message,
            action: ActivityAction::Update,
        };
        let updated = self
            .store
            .update_appointment(account_id, existing.id, existing.status, patch, log)
            .await?;
        info!("Appointment {} updated", existing.id);
        Ok(updated)
    }

    // ===== Cancel =====

    /// Cancels a non-terminal appointment. Cancelling a Scheduled one frees
    /// its staff member's capacity, so a promotion pass runs afterwards.
    pub async fn cancel_appointment(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let existing = self
            .store
            .appointment_by_id(account_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("Appointment not found".to_string()))?;
        if existing.status.is_terminal() {
            return Err(SchedulingError::InvalidRequest(format!(
                "Appointment is already {}",
                existing.status
            )));
        }

        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        };
        let log = NewActivityLog {
            account_id,
            staff_id: existing.staff_id,
            appointment_id: Some(existing.id),
            message: format!("Appointment for \"{}\" cancelled", existing.customer_name),
            action: ActivityAction::Cancel,
        };
        let cancelled = self
            .store
            .update_appointment(account_id, appointment_id, existing.status, patch, log)
            .await?;
        info!("Appointment {} cancelled", appointment_id);

        if existing.status == AppointmentStatus::Scheduled {
            if let Some(staff_id) = existing.staff_id {
                self.promote_for_staff(account_id, staff_id).await;
            }
        }
        Ok(cancelled)
    }

    // ===== Views =====

    /// Filtered listing with service and staff names resolved, plus the
    /// derived end time and an overdue flag.
    pub async fn list_appointments(
        &self,
        account_id: Uuid,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentView>, SchedulingError> {
        let appointments = self.store.list_appointments(account_id, filter).await?;
        let services: HashMap<Uuid, Service> = self
            .store
            .list_services(account_id, true)
            .await?
            .into_iter()
            .map(|service| (service.id, service))
            .collect();
        let staff: HashMap<Uuid, Staff> = self
            .store
            .list_staff(account_id)
            .await?
            .into_iter()
            .map(|member| (member.id, member))
            .collect();

        Ok(appointments
            .into_iter()
            .map(|appointment| {
                let service = services.get(&appointment.service_id);
                let member = appointment.staff_id.and_then(|id| staff.get(&id));
                self.view_of(appointment, service, member)
            })
            .collect())
    }

    pub async fn get_appointment(
        &self,
        account_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<AppointmentView, SchedulingError> {
        let appointment = self
            .store
            .appointment_by_id(account_id, appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("Appointment not found".to_string()))?;
        let service = self
            .store
            .service_by_id(account_id, appointment.service_id)
            .await?;
        let member = match appointment.staff_id {
            Some(staff_id) => self.store.staff_by_id(account_id, staff_id).await?,
            None => None,
        };
        Ok(self.view_of(appointment, service.as_ref(), member.as_ref()))
    }

    fn view_of(
        &self,
        appointment: Appointment,
        service: Option<&Service>,
        staff: Option<&Staff>,
    ) -> AppointmentView {
        let duration_minutes = service
            .map(|service| service.duration_minutes)
            .unwrap_or(self.fallback_duration_minutes);
        let end_time = end_of(appointment.start_time, duration_minutes);
        let is_overdue = !appointment.status.is_terminal() && end_time < Utc::now();
        AppointmentView {
            service_name: service.map(|service| service.name.clone()),
            staff_name: staff.map(|staff| staff.name.clone()),
            duration_minutes,
            end_time,
            is_overdue,
            appointment,
        }
    }

    // ===== Internals =====

    /// Freed capacity is backfilled opportunistically; a failed pass only
    /// logs, it never fails the transition that triggered it.
    async fn promote_for_staff(&self, account_id: Uuid, staff_id: Uuid) {
        let staff_type = match self.store.staff_by_id(account_id, staff_id).await {
            Ok(Some(staff)) => staff.service_type,
            Ok(None) => return,
            Err(err) => {
                warn!("Queue promotion skipped, staff lookup failed: {}", err);
                return;
            }
        };
        if let Err(err) = self
            .promoter
            .promote(account_id, Some(&staff_type), None)
            .await
        {
            warn!("Queue promotion after freed capacity failed: {}", err);
        }
    }

    async fn resolve_bookable_service(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Service, SchedulingError> {
        self.store
            .service_by_id(account_id, service_id)
            .await?
            .filter(|service| !service.is_deleted)
            .ok_or_else(|| {
                SchedulingError::NotFound(
                    "Service not found or does not belong to you".to_string(),
                )
            })
    }

    async fn validate_assignable_staff(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        service: &Service,
    ) -> Result<Staff, SchedulingError> {
        let staff = self
            .store
            .staff_by_id(account_id, staff_id)
            .await?
            .ok_or_else(|| {
                SchedulingError::NotFound(
                    "Staff member not found or does not belong to you".to_string(),
                )
            })?;
        if !staff.is_available() {
            return Err(SchedulingError::InvalidRequest(format!(
                "{} is not available for bookings",
                staff.name
            )));
        }
        if !service.matches_staff_type(&staff.service_type) {
            return Err(SchedulingError::InvalidRequest(format!(
                "{} does not provide \"{}\" services",
                staff.name, service.required_staff_type
            )));
        }
        Ok(staff)
    }

    fn new_appointment_row(account_id: Uuid, request: &CreateAppointmentRequest) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            account_id,
            customer_name: request.customer_name.trim().to_string(),
            customer_phone: request.customer_phone.clone(),
            customer_email: request.customer_email.clone(),
            service_id: request.service_id,
            staff_id: None,
            start_time: request.start_time,
            status: AppointmentStatus::Waiting,
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_from(request: &UpdateAppointmentRequest) -> AppointmentPatch {
        AppointmentPatch {
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            customer_email: request.customer_email.clone(),
            service_id: request.service_id,
            staff_id: request.staff_id,
            start_time: request.start_time,
            status: None,
        }
    }

    fn describe_changes(request: &UpdateAppointmentRequest) -> String {
        let mut fields = Vec::new();
        if request.customer_name.is_some() {
            fields.push("customer name");
        }
        if request.customer_phone.is_some() {
            fields.push("phone");
        }
        if request.customer_email.is_some() {
            fields.push("email");
        }
        if request.service_id.is_some() {
            fields.push("service");
        }
        if request.start_time.is_some() {
            fields.push("start time");
        }
        if request.staff_id.is_some() {
            fields.push("staff");
        }
        if request.status.is_some() {
            fields.push("status");
        }
        fields.join(", ")
    }
}
