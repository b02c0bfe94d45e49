pub mod eligibility;
pub mod roster;

pub use eligibility::EligibilityService;
pub use roster::RosterService;
