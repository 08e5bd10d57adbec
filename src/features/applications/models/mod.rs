mod application;

pub use application::{Applicant, ApplicationRequest, Volunteer, VolunteerApplication};
