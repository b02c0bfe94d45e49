use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("{staff_name} has reached daily capacity ({booked}/{capacity})")]
    CapacityExceeded {
        staff_id: Uuid,
        staff_name: String,
        booked: usize,
        capacity: i32,
    },

    #[error("{staff_name} already has an overlapping appointment at that time")]
    SchedulingConflict { staff_id: Uuid, staff_name: String },

    #[error("Storage error: {0}")]
    Storage(String),
}
