//! Joins over the loaded collections: the dashboard for one day and the
//! project overview for a window of days.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::availability::{AbsenceIndex, Availability, availability};
use crate::date_range::DateRange;
use crate::holidays::HolidayCalendar;
use crate::model::{AbsenceType, Assignment, CostCenter, Crew, Employee, TimelineItem};

/// Everything the views need, loaded once.
pub struct Snapshot<'a> {
    pub employees: &'a [Employee],
    pub absences: &'a AbsenceIndex,
    pub crews: &'a [Crew],
    pub assignments: &'a [Assignment],
    pub cost_centers: &'a [CostCenter],
    pub timeline: &'a [TimelineItem],
    pub calendar: &'a HolidayCalendar,
}

#[derive(Debug, Clone)]
pub struct AbsentEmployee<'a> {
    pub employee: &'a Employee,
    pub kind: AbsenceType,
    pub crew: Option<&'a Crew>,
}

#[derive(Debug, Clone)]
pub struct ActiveAssignment<'a> {
    pub assignment: &'a Assignment,
    pub cost_center: Option<&'a CostCenter>,
    pub crew: Option<&'a Crew>,
    pub availability: Availability,
}

#[derive(Debug, Clone)]
pub struct DaySummary<'a> {
    pub day: NaiveDate,
    pub holiday: Option<&'a str>,
    pub active_employees: usize,
    pub absent: Vec<AbsentEmployee<'a>>,
    /// Active employees not absent on the day, as a share of all active ones
    pub capacity: Availability,
    pub vacation: usize,
    pub sick: usize,
    pub active_cost_centers: usize,
    pub crew_members: usize,
    /// All timeline items, whether or not they run on the day
    pub timeline_items: usize,
    pub assignments: Vec<ActiveAssignment<'a>>,
}

/// A cost center with crews assigned inside the window.
#[derive(Debug, Clone)]
pub struct ProjectCard<'a> {
    pub cost_center: &'a CostCenter,
    pub assignments: Vec<(&'a Assignment, Option<&'a Crew>)>,
    /// Members of all assigned crews
    pub members: usize,
    /// Of those, absent on the reference day
    pub absent_members: usize,
}

impl<'a> Snapshot<'a> {
    pub fn crew(&self, id: u64) -> Option<&'a Crew> {
        self.crews.iter().find(|c| c.id == id)
    }

    pub fn cost_center(&self, id: u64) -> Option<&'a CostCenter> {
        self.cost_centers.iter().find(|k| k.id == id)
    }

    pub fn employee(&self, pers_nr: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.pers_nr == pers_nr)
    }

    pub fn crew_of(&self, pers_nr: &str) -> Option<&'a Crew> {
        Crew::of_person(self.crews, pers_nr)
    }

    /// The assignment of the person's crew covering `day`.
    pub fn assignment_for(&self, pers_nr: &str, day: NaiveDate) -> Option<&'a Assignment> {
        let crew = self.crew_of(pers_nr)?;
        Assignment::for_crew_on(self.assignments, crew.id, day)
    }

    /// Availability of a crew by id; unknown crews count as empty.
    pub fn crew_availability(&self, crew_id: u64, day: NaiveDate) -> Availability {
        match self.crew(crew_id) {
            Some(crew) => availability(crew, day, self.absences, self.calendar),
            None => Availability::new(0, 0),
        }
    }

    pub fn day_summary(&self, day: NaiveDate) -> DaySummary<'a> {
        let active: Vec<&Employee> = self.employees.iter().filter(|e| e.active).collect();
        let todays = self.absences.on_day(day);

        let absent: Vec<AbsentEmployee<'a>> = active
            .iter()
            .filter_map(|e| {
                let absence = self.absences.get(&e.pers_nr, day)?;
                Some(AbsentEmployee {
                    employee: *e,
                    kind: absence.kind,
                    crew: self.crew_of(&e.pers_nr),
                })
            })
            .collect();

        let assignments = Assignment::active_on(self.assignments, day)
            .into_iter()
            .map(|assignment| ActiveAssignment {
                assignment,
                cost_center: self.cost_center(assignment.cost_center_id),
                crew: self.crew(assignment.crew_id),
                availability: self.crew_availability(assignment.crew_id, day),
            })
            .collect();

        DaySummary {
            day,
            holiday: self.calendar.holiday_name(day),
            active_employees: active.len(),
            capacity: Availability::new(active.len(), active.len() - absent.len()),
            absent,
            vacation: todays.iter().filter(|a| a.kind == AbsenceType::Vacation).count(),
            sick: todays.iter().filter(|a| a.kind == AbsenceType::Sick).count(),
            active_cost_centers: self.cost_centers.iter().filter(|k| k.active).count(),
            crew_members: self.crews.iter().map(|c| c.members.len()).sum(),
            timeline_items: self.timeline.len(),
            assignments,
        }
    }

    /// Cost centers with an assignment overlapping `window`, in the order their
    /// first assignment appears. Absent members are counted for `day`.
    pub fn project_overview(&self, window: &DateRange, day: NaiveDate) -> Vec<ProjectCard<'a>> {
        let mut cards: Vec<ProjectCard<'a>> = Vec::new();

        for assignment in self.assignments.iter().filter(|a| a.overlaps(window)) {
            let Some(cost_center) = self.cost_center(assignment.cost_center_id) else {
                continue;
            };
            let crew = self.crew(assignment.crew_id);

            let idx = match cards.iter().position(|c| c.cost_center.id == cost_center.id) {
                Some(idx) => idx,
                None => {
                    cards.push(ProjectCard {
                        cost_center,
                        assignments: Vec::new(),
                        members: 0,
                        absent_members: 0,
                    });
                    cards.len() - 1
                }
            };

            let card = &mut cards[idx];
            if let Some(crew) = crew {
                card.members += crew.members.len();
                card.absent_members += crew
                    .member_pers_nrs()
                    .filter(|p| self.absences.is_absent(p, day))
                    .count();
            }
            card.assignments.push((assignment, crew));
        }

        cards
    }

    /// Distinct cost centers with an assignment overlapping `window`.
    pub fn active_cost_center_ids(&self, window: &DateRange) -> HashSet<u64> {
        self.assignments
            .iter()
            .filter(|a| a.overlaps(window))
            .map(|a| a.cost_center_id)
            .collect()
    }
}
