pub mod booking;
pub mod conflict;
pub mod assignment;
pub mod promoter;

pub use booking::AppointmentBookingService;
pub use conflict::ConflictChecker;
pub use assignment::AssignmentService;
pub use promoter::QueuePromoterService;
