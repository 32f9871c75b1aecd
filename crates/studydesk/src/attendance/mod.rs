pub mod calculator;
pub mod tracker;

pub use calculator::{
    bunkable_for_75, classes_needed_for_75, overall_percentage, percentage,
    project_future_attendance, FutureProjection,
};
pub use tracker::{AttendanceTracker, AttendanceView};
