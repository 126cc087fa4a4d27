//! Built-in option lists used while the company structure is not loaded.
//!
//! Pass these as the `fallback` argument of
//! [`filtered_positions`](super::filtered_positions) and
//! [`filtered_grades`](super::filtered_grades). Positions and grades here are
//! display names, so each option uses the name as its code.

use std::collections::HashSet;

use crate::api::types::CodeName;

use super::vocab::{Labeled, ShiftPreference, WorkSchedule};

struct FallbackDepartment {
    code: &'static str,
    name: &'static str,
    positions: &'static [&'static str],
    grades: &'static [&'static str],
}

const DEPARTMENTS: &[FallbackDepartment] = &[
    FallbackDepartment {
        code: "IT",
        name: "IT",
        positions: &["Бек разработчик", "Фронт разработчик", "Фул стак"],
        grades: &["Junior", "Middle", "Senior"],
    },
    FallbackDepartment {
        code: "Support",
        name: "Support",
        positions: &["Старший саппорт", "Младший саппорт"],
        grades: &["Junior", "Middle"],
    },
    FallbackDepartment {
        code: "Sales",
        name: "Sales",
        positions: &["Менеджер", "Потичск"],
        grades: &["Junior", "Middle", "Senior"],
    },
];

/// Shown when no department is selected; not a department of its own.
const ALL_POSITIONS_ORDER: &[&str] = &[
    "Фронт разработчик",
    "Бек разработчик",
    "Фул стак",
    "Квалити менеджер",
    "Старший саппорт",
    "Младший саппорт",
];

const SHIFT_OPTIONS: [ShiftPreference; 3] = [
    ShiftPreference::Day,
    ShiftPreference::Mixed,
    ShiftPreference::Night,
];

fn named(names: impl IntoIterator<Item = &'static str>) -> Vec<CodeName> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(*name))
        .map(|name| CodeName::new(name, name))
        .collect()
}

fn department(code: &str) -> Option<&'static FallbackDepartment> {
    DEPARTMENTS.iter().find(|dept| dept.code == code)
}

pub fn fallback_departments() -> Vec<CodeName> {
    DEPARTMENTS
        .iter()
        .map(|dept| CodeName::new(dept.code, dept.name))
        .collect()
}

/// Positions of `department_code`, or every known position when it is empty
/// or unknown.
pub fn fallback_positions(department_code: &str) -> Vec<CodeName> {
    match department(department_code) {
        Some(dept) => named(dept.positions.iter().copied()),
        None => named(
            ALL_POSITIONS_ORDER
                .iter()
                .chain(DEPARTMENTS.iter().flat_map(|d| d.positions.iter()))
                .copied(),
        ),
    }
}

/// Grades of `department_code`, or every known grade when it is empty or
/// unknown.
pub fn fallback_grades(department_code: &str) -> Vec<CodeName> {
    match department(department_code) {
        Some(dept) => named(dept.grades.iter().copied()),
        None => named(DEPARTMENTS.iter().flat_map(|d| d.grades.iter()).copied()),
    }
}

/// Work schedules as `{ code, label }` options.
pub fn schedule_options() -> Vec<CodeName> {
    use strum::IntoEnumIterator;
    WorkSchedule::iter()
        .map(|s| CodeName::new(s.to_string(), s.label()))
        .collect()
}

/// Shift preferences offered in filters. `morning` is accepted by the backend
/// but not offered.
pub fn shift_options() -> Vec<CodeName> {
    SHIFT_OPTIONS
        .iter()
        .map(|s| CodeName::new(s.to_string(), s.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{filtered_grades, filtered_positions};
    use pretty_assertions::assert_eq;

    fn codes(items: &[CodeName]) -> Vec<&str> {
        items.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn departments_exclude_the_all_bucket() {
        assert_eq!(codes(&fallback_departments()), vec!["IT", "Support", "Sales"]);
    }

    #[test]
    fn positions_by_department_or_all() {
        assert_eq!(
            codes(&fallback_positions("Support")),
            vec!["Старший саппорт", "Младший саппорт"]
        );
        let all = fallback_positions("");
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].code, "Фронт разработчик");
        assert_eq!(fallback_positions("HR"), all);
    }

    #[test]
    fn grades_by_department_or_all() {
        assert_eq!(codes(&fallback_grades("Support")), vec!["Junior", "Middle"]);
        assert_eq!(codes(&fallback_grades("")), vec!["Junior", "Middle", "Senior"]);
    }

    #[test]
    fn schedule_and_shift_labels() {
        let schedules = schedule_options();
        assert_eq!(schedules[1], CodeName::new("shift_schedule", "Сменный"));
        assert_eq!(
            shift_options()
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Дневная", "Любая", "Ночная"]
        );
    }

    #[test]
    fn filters_use_catalogue_when_structure_missing() {
        let positions = filtered_positions(None, "IT", &fallback_positions("IT"));
        assert_eq!(positions.len(), 3);
        let grades = filtered_grades(None, "Sales", "", &fallback_grades("Sales"));
        assert_eq!(codes(&grades), vec!["Junior", "Middle", "Senior"]);
    }
}
