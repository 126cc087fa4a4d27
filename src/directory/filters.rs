//! Cascading department → position → grade option lists.
//!
//! A structure that is `None` or has no departments counts as "not loaded",
//! in which case the caller-supplied fallback list is returned. An empty
//! selection code means "nothing selected".

use std::collections::HashSet;

use crate::api::types::{CodeName, CompanyStructure, StructureDepartment, StructurePosition};

fn loaded(structure: Option<&CompanyStructure>) -> Option<&CompanyStructure> {
    structure.filter(|s| !s.data.is_empty())
}

fn unique_by_code(items: impl IntoIterator<Item = CodeName>) -> Vec<CodeName> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.code.clone()))
        .collect()
}

/// Positions to offer for the selected department.
///
/// With no department selected, every position across all departments is
/// offered once, in first-seen order.
pub fn filtered_positions(
    structure: Option<&CompanyStructure>,
    department_code: &str,
    fallback: &[CodeName],
) -> Vec<CodeName> {
    let Some(structure) = loaded(structure) else {
        return fallback.to_vec();
    };

    if !department_code.is_empty() {
        return structure
            .data
            .iter()
            .find(|dept| dept.code == department_code)
            .map(|dept| {
                dept.positions
                    .iter()
                    .map(|pos| CodeName::new(&pos.code, &pos.name))
                    .collect()
            })
            .unwrap_or_default();
    }

    unique_by_code(
        structure
            .data
            .iter()
            .flat_map(|dept| dept.positions.iter())
            .map(|pos| CodeName::new(&pos.code, &pos.name)),
    )
}

/// Grades to offer for the selected department and position.
///
/// The most specific selection wins: a position's own grades, then the union
/// of grades across a department's positions, then the flat grade list.
pub fn filtered_grades(
    structure: Option<&CompanyStructure>,
    department_code: &str,
    position_code: &str,
    fallback: &[CodeName],
) -> Vec<CodeName> {
    let Some(structure) = loaded(structure) else {
        return fallback.to_vec();
    };

    if !position_code.is_empty() {
        let own = structure
            .data
            .iter()
            .filter_map(|dept| dept.positions.iter().find(|p| p.code == position_code))
            .find(|pos| !pos.grades.is_empty());
        if let Some(pos) = own {
            return pos.grades.iter().map(|g| g.code_name()).collect();
        }
        return structure.grades.clone();
    }

    if !department_code.is_empty() {
        if let Some(dept) = structure.data.iter().find(|d| d.code == department_code) {
            let grades = unique_by_code(
                dept.positions
                    .iter()
                    .flat_map(|pos| pos.grades.iter())
                    .map(|g| g.code_name()),
            );
            if !grades.is_empty() {
                return grades;
            }
        }
        return structure.grades.clone();
    }

    structure.grades.clone()
}

/// All departments as select options.
pub fn departments(structure: Option<&CompanyStructure>) -> Vec<CodeName> {
    loaded(structure)
        .map(|s| {
            s.data
                .iter()
                .map(|dept| CodeName::new(&dept.code, &dept.name))
                .collect()
        })
        .unwrap_or_default()
}

/// The flat grade list, even when no departments are loaded.
pub fn all_grades(structure: Option<&CompanyStructure>) -> Vec<CodeName> {
    structure.map(|s| s.grades.clone()).unwrap_or_default()
}

pub fn find_position<'a>(
    structure: Option<&'a CompanyStructure>,
    position_code: &str,
) -> Option<&'a StructurePosition> {
    if position_code.is_empty() {
        return None;
    }
    loaded(structure)?
        .data
        .iter()
        .flat_map(|dept| dept.positions.iter())
        .find(|pos| pos.code == position_code)
}

pub fn find_department<'a>(
    structure: Option<&'a CompanyStructure>,
    department_code: &str,
) -> Option<&'a StructureDepartment> {
    if department_code.is_empty() {
        return None;
    }
    loaded(structure)?
        .data
        .iter()
        .find(|dept| dept.code == department_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CatalogItem;
    use pretty_assertions::assert_eq;

    fn grade(code: &str) -> CatalogItem {
        CatalogItem {
            id: format!("g-{code}"),
            code: code.to_string(),
            name: code.to_uppercase(),
            is_active: true,
        }
    }

    fn position(code: &str, grades: &[&str]) -> StructurePosition {
        StructurePosition {
            id: format!("p-{code}"),
            code: code.to_string(),
            name: format!("Position {code}"),
            is_active: true,
            work_schedule: None,
            shift_preferences: Vec::new(),
            grades: grades.iter().map(|g| grade(g)).collect(),
        }
    }

    fn department(code: &str, positions: Vec<StructurePosition>) -> StructureDepartment {
        StructureDepartment {
            id: format!("d-{code}"),
            code: code.to_string(),
            name: format!("Dept {code}"),
            is_active: true,
            positions,
            grades: Vec::new(),
        }
    }

    fn structure() -> CompanyStructure {
        CompanyStructure {
            data: vec![
                department(
                    "IT",
                    vec![
                        position("frontend", &["junior", "middle"]),
                        position("backend", &["middle", "senior"]),
                        position("fullstack", &[]),
                    ],
                ),
                department(
                    "Support",
                    vec![position("support", &["junior"]), position("frontend", &["lead"])],
                ),
                department("Sales", vec![position("manager", &[])]),
            ],
            positions: Vec::new(),
            grades: vec![
                CodeName::new("junior", "Junior"),
                CodeName::new("middle", "Middle"),
                CodeName::new("senior", "Senior"),
            ],
        }
    }

    fn codes(items: &[CodeName]) -> Vec<&str> {
        items.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn positions_fall_back_when_not_loaded() {
        let fallback = vec![CodeName::new("x", "X")];
        assert_eq!(filtered_positions(None, "", &fallback), fallback);
        let empty = CompanyStructure::default();
        assert_eq!(filtered_positions(Some(&empty), "IT", &fallback), fallback);
    }

    #[test]
    fn positions_for_selected_department() {
        let s = structure();
        assert_eq!(
            codes(&filtered_positions(Some(&s), "IT", &[])),
            vec!["frontend", "backend", "fullstack"]
        );
        assert!(filtered_positions(Some(&s), "Nope", &[]).is_empty());
    }

    #[test]
    fn positions_without_department_are_unique_in_first_seen_order() {
        let s = structure();
        assert_eq!(
            codes(&filtered_positions(Some(&s), "", &[])),
            vec!["frontend", "backend", "fullstack", "support", "manager"]
        );
    }

    #[test]
    fn grades_for_position_use_first_position_with_grades() {
        let s = structure();
        assert_eq!(
            codes(&filtered_grades(Some(&s), "", "frontend", &[])),
            vec!["junior", "middle"]
        );
        assert_eq!(
            codes(&filtered_grades(Some(&s), "IT", "fullstack", &[])),
            vec!["junior", "middle", "senior"]
        );
    }

    #[test]
    fn grades_for_department_are_union_of_positions() {
        let s = structure();
        assert_eq!(
            codes(&filtered_grades(Some(&s), "IT", "", &[])),
            vec!["junior", "middle", "senior"]
        );
        assert_eq!(
            codes(&filtered_grades(Some(&s), "Support", "", &[])),
            vec!["junior", "lead"]
        );
        assert_eq!(
            codes(&filtered_grades(Some(&s), "Sales", "", &[])),
            vec!["junior", "middle", "senior"]
        );
    }

    #[test]
    fn grades_without_selection_use_flat_list_or_fallback() {
        let s = structure();
        assert_eq!(filtered_grades(Some(&s), "", "", &[]), s.grades);
        let fallback = vec![CodeName::new("intern", "Intern")];
        assert_eq!(filtered_grades(None, "IT", "frontend", &fallback), fallback);
    }

    #[test]
    fn lookups_by_code() {
        let s = structure();
        assert_eq!(codes(&departments(Some(&s))), vec!["IT", "Support", "Sales"]);
        assert!(departments(None).is_empty());
        assert_eq!(all_grades(Some(&s)).len(), 3);
        assert_eq!(find_position(Some(&s), "backend").unwrap().grades.len(), 2);
        assert!(find_position(Some(&s), "").is_none());
        assert_eq!(find_department(Some(&s), "Sales").unwrap().positions.len(), 1);
        assert!(find_department(Some(&s), "HR").is_none());
    }
}
