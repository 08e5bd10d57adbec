pub mod applications;
pub mod opportunities;
pub mod submission;
