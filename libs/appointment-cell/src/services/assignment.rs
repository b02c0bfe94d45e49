// libs/appointment-cell/src/services/assignment.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_models::{AppointmentWrite, NewActivityLog, SchedulingError};
use shared_storage::SchedulingStore;
use staff_cell::StaffCandidate;

use crate::models::AssignmentOutcome;
use crate::services::conflict::ConflictChecker;

/// Greedy first-fit selection over pre-ordered candidates.
///
/// Each attempt is a guarded commit: the store re-reads the candidate's
/// slots under its lock and the conflict rules decide there, so two racing
/// assignments can never double-book a staff member. Candidates rejected for
/// capacity or conflict are skipped; the first one whose commit lands wins.
pub struct AssignmentService {
    store: Arc<dyn SchedulingStore>,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Try the candidates in order and return the first successful commit,
    /// or `None` when every candidate is full or conflicting. `write_for`
    /// and `log_for` build the per-candidate write and its log entry;
    /// `exclude` frees the appointment's own booking during reschedules.
    pub async fn assign_first_fit<W, L>(
        &self,
        account_id: Uuid,
        candidates: &[StaffCandidate],
        start: DateTime<Utc>,
        duration_minutes: i64,
        exclude: Option<Uuid>,
        write_for: W,
        log_for: L,
    ) -> Result<Option<AssignmentOutcome>, SchedulingError>
    where
        W: Fn(&StaffCandidate) -> AppointmentWrite,
        L: Fn(&StaffCandidate) -> NewActivityLog,
    {
        for candidate in candidates {
            let guard = ConflictChecker::guard(&candidate.staff, start, duration_minutes, exclude);
            let attempt = self
                .store
                .commit_scheduled(
                    account_id,
                    candidate.staff.id,
                    guard,
                    write_for(candidate),
                    log_for(candidate),
                )
                .await;

            match attempt {
                Ok(appointment) => {
                    debug!(
                        "Assigned appointment {} to {}",
                        appointment.id, candidate.staff.name
                    );
                    return Ok(Some(AssignmentOutcome {
                        appointment,
                        staff: candidate.staff.clone(),
                    }));
                }
                Err(SchedulingError::CapacityExceeded { .. })
                | Err(SchedulingError::SchedulingConflict { .. }) => {
                    debug!(
                        "{} cannot take the {} slot, trying next candidate",
                        candidate.staff.name, start
                    );
                    continue;
                }
                Err(other) => return Err(other),
            }
        }

        Ok(None)
    }
}
