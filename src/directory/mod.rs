//! Company-directory helpers: option lists for the department → position →
//! grade selects, and the known schedule/shift/role vocabularies.

pub mod fallback;
pub mod filters;
pub mod vocab;

pub use fallback::{
    fallback_departments, fallback_grades, fallback_positions, schedule_options, shift_options,
};
pub use filters::{
    all_grades, departments, filtered_grades, filtered_positions, find_department, find_position,
};
pub use vocab::{label_for, Labeled, ShiftPreference, UserRole, WorkSchedule};
