// =============================================================================
// ALERT MESSAGES
// =============================================================================

/// Informational status for an edit submitted without any field change
pub const NO_CHANGES_MESSAGE: &str = "No changes detected.";

pub const OPPORTUNITY_CREATED_MESSAGE: &str = "Opportunity published successfully!";

pub const OPPORTUNITY_UPDATED_MESSAGE: &str = "Opportunity updated successfully!";

pub const OPPORTUNITY_DELETED_MESSAGE: &str = "Opportunity deleted successfully!";

pub const CREATE_FAILED_MESSAGE: &str = "Failed to publish opportunity.";

pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update opportunity.";

pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete opportunity.";

pub const APPLICATION_FAILED_MESSAGE: &str = "Failed to submit application.";

pub const NO_OPPORTUNITY_AVAILABLE_MESSAGE: &str = "No opportunity available for subscription.";

/// Placeholder for empty values on opportunity cards
pub const NOT_INFORMED: &str = "Not informed";
