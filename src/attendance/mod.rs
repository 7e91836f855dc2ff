pub mod classifier;
pub mod roster;
pub mod seed;
pub mod service;

pub use classifier::AttendancePolicy;
pub use service::{AttendanceService, TodayStatus};
