//! Grouping and filtering of employees for the grids.

use std::collections::HashSet;

use crate::model::Employee;

/// Display order of the employee groups.
pub const GROUP_ORDER: &[&str] = &[
    "Geschaeftsleitung",
    "Bauleiter",
    "Poliere",
    "Leitungsbau",
    "Kanalbau",
    "Hausanschluss",
    "Werkstatt/Lager",
    "Buero",
    "Azubis",
    "Minijob",
    "Praktikanten",
    "Zeitarbeit",
    "Subunternehmer",
    "Geraetefahrer",
    "Sonstige",
];

/// Group used for employees without one.
pub const FALLBACK_GROUP: &str = "Sonstige";

/// Groups never offered when picking crew members.
pub const EXCLUDED_FROM_CREWS: &[&str] = &["Krankengeld / Ausgesteuert", "Ausgeschiedene Mitarbeiter"];

/// Presence filter relative to a set of people absent today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Available,
    Absent,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of display name or personnel number
    pub search: Option<String>,
    /// Exact group name
    pub group: Option<String>,
    pub presence: Option<Presence>,
    /// Skip inactive employees
    pub active_only: bool,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee, absent_today: &HashSet<&str>) -> bool {
        if self.active_only && !employee.active {
            return false;
        }
        if let Some(group) = &self.group {
            if group_name(employee) != group {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !matches_search(employee, search) {
                return false;
            }
        }
        match self.presence {
            Some(Presence::Available) => !absent_today.contains(employee.pers_nr.as_str()),
            Some(Presence::Absent) => absent_today.contains(employee.pers_nr.as_str()),
            None => true,
        }
    }
}

/// Employees of one group, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeGroup<'a> {
    pub name: String,
    pub members: Vec<&'a Employee>,
}

pub fn matches_search(employee: &Employee, search: &str) -> bool {
    let needle = search.to_lowercase();
    employee.display_name().to_lowercase().contains(&needle)
        || employee.pers_nr.to_lowercase().contains(&needle)
}

fn group_name(employee: &Employee) -> &str {
    if employee.group.trim().is_empty() {
        FALLBACK_GROUP
    } else {
        &employee.group
    }
}

/// Group employees by `Gruppe`: groups from [`GROUP_ORDER`] first, in that
/// order, then any other group in the order it was first seen.
pub fn group_employees<'a>(
    employees: &'a [Employee],
    filter: &EmployeeFilter,
    absent_today: &HashSet<&str>,
) -> Vec<EmployeeGroup<'a>> {
    let mut groups: Vec<EmployeeGroup<'a>> = Vec::new();

    for employee in employees.iter().filter(|e| filter.matches(e, absent_today)) {
        let name = group_name(employee);
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.members.push(employee),
            None => groups.push(EmployeeGroup {
                name: name.to_string(),
                members: vec![employee],
            }),
        }
    }

    // Stable sort keeps encounter order for groups outside the fixed list
    groups.sort_by_key(|g| {
        GROUP_ORDER
            .iter()
            .position(|known| *known == g.name)
            .unwrap_or(GROUP_ORDER.len())
    });
    groups
}

/// Active employees that may be added to a crew.
pub fn crew_candidates<'a>(employees: &'a [Employee], search: Option<&str>) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|e| e.active && !EXCLUDED_FROM_CREWS.contains(&e.group.as_str()))
        .filter(|e| search.is_none_or(|s| matches_search(e, s)))
        .collect()
}

/// Distinct groups of active employees, sorted alphabetically.
pub fn active_groups(employees: &[Employee]) -> Vec<String> {
    let mut groups: Vec<String> = employees
        .iter()
        .filter(|e| e.active)
        .map(|e| group_name(e).to_string())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    groups.sort();
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u64, pers_nr: &str, name: &str, group: &str) -> Employee {
        Employee {
            id,
            pers_nr: pers_nr.into(),
            name: name.into(),
            first_name: None,
            group: group.into(),
            notes: None,
            leave_days: 30,
            active: true,
        }
    }

    fn staff() -> Vec<Employee> {
        vec![
            employee(1, "100", "Becker", "Kanalbau"),
            employee(2, "200", "Arslan", "Zirkus"),
            employee(3, "300", "Schulz", "Bauleiter"),
            employee(4, "400", "Wagner", ""),
            employee(5, "500", "Yilmaz", "Aushilfen"),
            employee(6, "600", "Klein", "Kanalbau"),
        ]
    }

    #[test]
    fn test_fixed_order_then_encounter_order() {
        let staff = staff();
        let groups = group_employees(&staff, &EmployeeFilter::default(), &HashSet::new());
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Bauleiter", "Kanalbau", "Sonstige", "Zirkus", "Aushilfen"]);

        let kanalbau: Vec<u64> = groups[1].members.iter().map(|e| e.id).collect();
        assert_eq!(kanalbau, vec![1, 6]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let staff = staff();
        let filter = EmployeeFilter {
            search: Some("BECK".into()),
            ..Default::default()
        };
        let groups = group_employees(&staff, &filter, &HashSet::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members[0].pers_nr, "100");

        let by_number = EmployeeFilter {
            search: Some("30".into()),
            ..Default::default()
        };
        let groups = group_employees(&staff, &by_number, &HashSet::new());
        assert_eq!(groups[0].members[0].name, "Schulz");
    }

    #[test]
    fn test_search_covers_first_name() {
        let mut e = employee(1, "1", "Becker", "Buero");
        e.first_name = Some("Jana".into());
        assert!(matches_search(&e, "jana b"));
    }

    #[test]
    fn test_presence_filter() {
        let staff = staff();
        let absent: HashSet<&str> = ["100"].into_iter().collect();

        let only_absent = EmployeeFilter {
            presence: Some(Presence::Absent),
            ..Default::default()
        };
        let groups = group_employees(&staff, &only_absent, &absent);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 1);

        let only_available = EmployeeFilter {
            presence: Some(Presence::Available),
            group: Some("Kanalbau".into()),
            ..Default::default()
        };
        let groups = group_employees(&staff, &only_available, &absent);
        assert_eq!(groups[0].members[0].pers_nr, "600");
    }

    #[test]
    fn test_crew_candidates_skip_excluded_groups() {
        let mut staff = staff();
        staff.push(employee(7, "700", "Alt", "Ausgeschiedene Mitarbeiter"));
        staff[0].active = false;

        let ids: Vec<u64> = crew_candidates(&staff, None).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
        assert_eq!(crew_candidates(&staff, Some("klein")).len(), 1);
    }

    #[test]
    fn test_active_groups() {
        assert_eq!(
            active_groups(&staff()),
            vec!["Aushilfen", "Bauleiter", "Kanalbau", "Sonstige", "Zirkus"]
        );
    }
}
