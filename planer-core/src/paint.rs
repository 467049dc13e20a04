//! What happens when a cell of the absence grid is painted.

use chrono::NaiveDate;

use crate::holidays::HolidayCalendar;
use crate::model::{Absence, AbsenceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    Set(AbsenceType),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintAction {
    /// Weekend or holiday cell, nothing may be painted
    Blocked,
    /// Upsert the absence for the cell
    Set(AbsenceType),
    /// Delete the existing absence with this id
    Delete(u64),
    Nothing,
}

/// Decide what painting `brush` onto a cell does.
///
/// Painting the type a cell already has toggles it off. Painting another type
/// replaces it through the upsert, keeping the row.
pub fn paint(
    existing: Option<&Absence>,
    brush: Brush,
    day: NaiveDate,
    calendar: &HolidayCalendar,
) -> PaintAction {
    if !calendar.is_workday(day) {
        return PaintAction::Blocked;
    }

    match (brush, existing) {
        (Brush::Clear, Some(absence)) => PaintAction::Delete(absence.id),
        (Brush::Clear, None) => PaintAction::Nothing,
        (Brush::Set(kind), Some(absence)) if absence.kind == kind => PaintAction::Delete(absence.id),
        (Brush::Set(kind), _) => PaintAction::Set(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_day;

    fn vacation(id: u64, day: NaiveDate) -> Absence {
        Absence {
            id,
            title: Absence::natural_key("1234", day),
            pers_nr: "1234".into(),
            date: day,
            kind: AbsenceType::Vacation,
        }
    }

    #[test]
    fn test_paint_decisions() {
        let cal = HolidayCalendar::default();
        let day = parse_day("2026-03-10").unwrap();
        let existing = vacation(5, day);

        assert_eq!(
            paint(None, Brush::Set(AbsenceType::Sick), day, &cal),
            PaintAction::Set(AbsenceType::Sick)
        );
        assert_eq!(
            paint(Some(&existing), Brush::Set(AbsenceType::Vacation), day, &cal),
            PaintAction::Delete(5)
        );
        assert_eq!(
            paint(Some(&existing), Brush::Set(AbsenceType::Sick), day, &cal),
            PaintAction::Set(AbsenceType::Sick)
        );
        assert_eq!(paint(Some(&existing), Brush::Clear, day, &cal), PaintAction::Delete(5));
        assert_eq!(paint(None, Brush::Clear, day, &cal), PaintAction::Nothing);
    }

    #[test]
    fn test_weekend_and_holiday_are_blocked() {
        let cal = HolidayCalendar::default();
        for d in ["2026-03-14", "2026-01-01"] {
            let day = parse_day(d).unwrap();
            assert_eq!(
                paint(None, Brush::Set(AbsenceType::Vacation), day, &cal),
                PaintAction::Blocked
            );
        }
    }
}
