mod opportunity;

pub use opportunity::{ActionType, OpportunityRecord, OpportunityStatus};
