use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::{SchedulingError, Service, Staff, StaffStatus};
use shared_storage::SchedulingStore;

use crate::models::{CreateServiceRequest, CreateStaffRequest, RosterValidationRules};

/// Account-scoped staff and service administration.
pub struct RosterService {
    store: Arc<dyn SchedulingStore>,
    rules: RosterValidationRules,
}

impl RosterService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            store,
            rules: RosterValidationRules::default(),
        }
    }

    /// Register a new staff member. Status defaults to Available.
    pub async fn create_staff(
        &self,
        account_id: Uuid,
        request: CreateStaffRequest,
    ) -> Result<Staff, SchedulingError> {
        let name = request.name.trim();
        if name.len() < self.rules.min_name_len {
            return Err(SchedulingError::InvalidRequest(format!(
                "Staff name must be at least {} characters",
                self.rules.min_name_len
            )));
        }
        let service_type = request.service_type.trim();
        if service_type.len() < self.rules.min_type_len {
            return Err(SchedulingError::InvalidRequest(format!(
                "Service type must be at least {} characters",
                self.rules.min_type_len
            )));
        }
        if request.daily_capacity < self.rules.min_daily_capacity {
            return Err(SchedulingError::InvalidRequest(format!(
                "Daily capacity must be at least {}",
                self.rules.min_daily_capacity
            )));
        }

        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4(),
            account_id,
            name: name.to_string(),
            service_type: service_type.to_string(),
            daily_capacity: request.daily_capacity,
            status: request.status.unwrap_or(StaffStatus::Available),
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert_staff(staff).await?;
        info!(
            "Registered staff member {} ({}, capacity {}/day)",
            created.name, created.service_type, created.daily_capacity
        );
        Ok(created)
    }

    pub async fn list_staff(&self, account_id: Uuid) -> Result<Vec<Staff>, SchedulingError> {
        self.store.list_staff(account_id).await
    }

    /// Flip a staff member between Available, OnLeave and Blocked. Existing
    /// committed bookings are left alone; the member simply stops receiving
    /// new assignments while unavailable.
    pub async fn set_staff_status(
        &self,
        account_id: Uuid,
        staff_id: Uuid,
        status: StaffStatus,
    ) -> Result<Staff, SchedulingError> {
        let updated = self
            .store
            .update_staff_status(account_id, staff_id, status)
            .await?;
        info!("Staff member {} is now {}", updated.name, updated.status);
        Ok(updated)
    }

    /// Add a bookable service. At least one Available staff member of the
    /// required type must already exist, otherwise every booking of the new
    /// service would land in the waiting queue immediately.
    pub async fn create_service(
        &self,
        account_id: Uuid,
        request: CreateServiceRequest,
    ) -> Result<Service, SchedulingError> {
        let name = request.name.trim();
        if name.len() < self.rules.min_name_len {
            return Err(SchedulingError::InvalidRequest(format!(
                "Service name must be at least {} characters",
                self.rules.min_name_len
            )));
        }
        let required_staff_type = request.required_staff_type.trim();
        if required_staff_type.len() < self.rules.min_type_len {
            return Err(SchedulingError::InvalidRequest(format!(
                "Required staff type must be at least {} characters",
                self.rules.min_type_len
            )));
        }
        if request.duration_minutes < self.rules.min_duration_minutes {
            return Err(SchedulingError::InvalidRequest(format!(
                "Duration must be at least {} minute(s)",
                self.rules.min_duration_minutes
            )));
        }

        let available = self
            .store
            .available_staff_by_type(account_id, required_staff_type)
            .await?;
        if available.is_empty() {
            return Err(SchedulingError::InvalidRequest(format!(
                "No available staff found for service type: {}",
                required_staff_type
            )));
        }
        debug!(
            "{} available staff can perform new service '{}'",
            available.len(),
            name
        );

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            account_id,
            name: name.to_string(),
            duration_minutes: request.duration_minutes,
            required_staff_type: required_staff_type.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert_service(service).await?;
        info!(
            "Added service {} ({} min, requires {})",
            created.name, created.duration_minutes, created.required_staff_type
        );
        Ok(created)
    }

    pub async fn list_services(&self, account_id: Uuid) -> Result<Vec<Service>, SchedulingError> {
        self.store.list_services(account_id, false).await
    }

    /// Soft-delete: the service disappears from listings and new bookings but
    /// stays resolvable for the durations of appointments already pointing at
    /// it.
    pub async fn delete_service(
        &self,
        account_id: Uuid,
        service_id: Uuid,
    ) -> Result<Service, SchedulingError> {
        let deleted = self.store.mark_service_deleted(account_id, service_id).await?;
        info!("Retired service {}", deleted.name);
        Ok(deleted)
    }
}
