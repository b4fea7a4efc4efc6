pub mod attendance;
#[allow(dead_code)]
pub mod attendee_views;
pub mod calls;
#[allow(dead_code)]
pub mod events;
#[allow(dead_code)]
pub mod persons;

pub use attendance::{AttendanceRow, AttendeeStatus};
pub use attendee_views::AttendeeViewRow;
pub use calls::{CallOutcome, CallRow};
pub use events::EventRow;
pub use persons::{PersonRow, UnregisteredPersonRow};
