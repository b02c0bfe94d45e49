pub mod assign;

pub use assign::QueueAssignmentService;
