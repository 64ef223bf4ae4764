pub mod assignments;
pub mod client;
pub mod records;
pub mod summary;

pub use assignments::{
    AssignmentDetails, FileLink, assignment_details, find_assignment_by_name, late_assignments,
    parse_due_at, upcoming_assignments,
};
pub use client::CanvasClient;
pub use records::{Assignment, Course};
pub use summary::{AssignmentSummary, SummaryEntry, assignment_summary, build_summary};
