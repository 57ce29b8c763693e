pub mod submission;
pub mod export;

pub use submission::{validate_signup, LoginRequest, SignupRequest};
pub use export::{export_schedule_csv, export_schedule_to_path};
