//! Terminal rendering for planner types.
//!
//! Extension traits that add colored output to planer-core types using
//! owo_colors.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::availability::{Availability, Tier};
use planer_core::holidays::HolidayCalendar;
use planer_core::{AbsenceType, CostCenter, Crew, Employee};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn absence_rgb(kind: AbsenceType) -> (u8, u8, u8) {
    match kind {
        AbsenceType::Vacation => (0x4A, 0x90, 0xD9),
        AbsenceType::Sick => (0xE7, 0x4C, 0x3C),
        AbsenceType::Excused => (0xF3, 0x9C, 0x12),
        AbsenceType::Internship => (0x9B, 0x59, 0xB6),
        AbsenceType::School => (0x1A, 0xBC, 0x9C),
        AbsenceType::HalfDay => (0x95, 0xA5, 0xA6),
        AbsenceType::AfternoonVacation => (0x6B, 0xAE, 0xD6),
        AbsenceType::CompanyShutdown => (0x34, 0x49, 0x5E),
    }
}

/// Colorize text in the color of an absence type
pub fn colorize_absence(kind: AbsenceType, text: &str) -> String {
    let (r, g, b) = absence_rgb(kind);
    text.truecolor(r, g, b).bold().to_string()
}

impl Render for AbsenceType {
    fn render(&self) -> String {
        colorize_absence(*self, self.code())
    }
}

/// Colorize text according to the availability tier
pub fn colorize_tier(tier: Tier, text: &str) -> String {
    match tier {
        Tier::Green => text.green().to_string(),
        Tier::Orange => text.yellow().to_string(),
        Tier::Red => text.red().to_string(),
    }
}

impl Render for Availability {
    fn render(&self) -> String {
        let text = format!("{}/{} ({}%)", self.available, self.total, self.percent);
        colorize_tier(self.tier(), &text)
    }
}

impl Render for Employee {
    fn render(&self) -> String {
        format!("{} {}", self.display_name(), format!("#{}", self.pers_nr).dimmed())
    }
}

impl Render for Crew {
    fn render(&self) -> String {
        match &self.foreman {
            Some(foreman) => format!("{} {}", self.name.bold(), format!("(Polier: {})", foreman).dimmed()),
            None => self.name.bold().to_string(),
        }
    }
}

impl Render for CostCenter {
    fn render(&self) -> String {
        format!("{} {}", self.number().cyan(), self.name())
    }
}

/// One grid cell, two characters wide.
///
/// Absences win over the calendar so stored entries on holidays stay visible.
pub fn day_cell(kind: Option<AbsenceType>, day: NaiveDate, calendar: &HolidayCalendar) -> String {
    if let Some(kind) = kind {
        return colorize_absence(kind, &format!("{:<2}", kind.code()));
    }
    if calendar.is_holiday(day) {
        return "F ".dimmed().to_string();
    }
    if calendar.is_weekend(day) {
        return "· ".dimmed().to_string();
    }
    "  ".to_string()
}

/// A percentage cell for the availability matrix, three characters wide.
pub fn percent_cell(availability: &Availability, day: NaiveDate, calendar: &HolidayCalendar) -> String {
    tiered_cell(availability, availability.tier(), day, calendar)
}

/// Like [`percent_cell`], coloured by the exact ratio instead of the
/// rounded percent.
pub fn exact_percent_cell(availability: &Availability, day: NaiveDate, calendar: &HolidayCalendar) -> String {
    tiered_cell(availability, availability.exact_tier(), day, calendar)
}

fn tiered_cell(availability: &Availability, tier: Tier, day: NaiveDate, calendar: &HolidayCalendar) -> String {
    if !calendar.is_workday(day) {
        return " · ".dimmed().to_string();
    }
    if availability.total == 0 {
        return "  -".dimmed().to_string();
    }
    colorize_tier(tier, &format!("{:>3}", availability.percent))
}

/// Progress bar for timeline items, `width` characters.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled).green(),
        "░".repeat(width - filled).dimmed()
    )
}

/// Header rows of a day grid: day of month, then weekday initials.
pub fn day_header(days: &[NaiveDate], today: NaiveDate, width: usize, label_width: usize) -> [String; 2] {
    use chrono::Datelike;

    let mut numbers = format!("{:label_width$}", "");
    let mut weekdays = format!("{:label_width$}", "");

    for day in days {
        let number = format!("{:<width$}", day.day());
        let weekday = format!("{:<width$}", &planer_core::dates::weekday_short(*day)[..1]);
        if *day == today {
            numbers.push_str(&number.black().on_yellow().to_string());
            weekdays.push_str(&weekday.black().on_yellow().to_string());
        } else {
            numbers.push_str(&number.dimmed().to_string());
            weekdays.push_str(&weekday.dimmed().to_string());
        }
    }

    [numbers, weekdays]
}

/// Simple pluralization helper
pub fn pluralize<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Text without ANSI escape sequences.
#[cfg(test)]
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (false, c) => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use planer_core::dates::parse_day;

    #[test]
    fn test_day_cell() {
        let calendar = HolidayCalendar::default();
        let workday = parse_day("2026-03-10").unwrap();
        let saturday = parse_day("2026-03-14").unwrap();
        let holiday = parse_day("2026-01-01").unwrap();

        assert_eq!(strip_ansi(&day_cell(Some(AbsenceType::Sick), workday, &calendar)), "K ");
        assert_eq!(strip_ansi(&day_cell(Some(AbsenceType::CompanyShutdown), workday, &calendar)), "BU");
        assert_eq!(strip_ansi(&day_cell(None, saturday, &calendar)), "· ");
        assert_eq!(strip_ansi(&day_cell(None, holiday, &calendar)), "F ");
        assert_eq!(strip_ansi(&day_cell(Some(AbsenceType::Vacation), holiday, &calendar)), "U ");
        assert_eq!(day_cell(None, workday, &calendar), "  ");
    }

    #[test]
    fn test_availability_text() {
        let availability = Availability::new(5, 4);
        assert_eq!(strip_ansi(&availability.render()), "4/5 (80%)");
    }

    #[test]
    fn test_percent_cell() {
        let calendar = HolidayCalendar::default();
        let workday = parse_day("2026-03-10").unwrap();
        assert_eq!(strip_ansi(&percent_cell(&Availability::new(3, 2), workday, &calendar)), " 67");
        assert_eq!(strip_ansi(&percent_cell(&Availability::new(0, 0), workday, &calendar)), "  -");
    }

    #[test]
    fn test_exact_percent_cell_colour() {
        let calendar = HolidayCalendar::default();
        let workday = parse_day("2026-03-10").unwrap();
        let availability = Availability::new(500, 398);

        assert_eq!(
            exact_percent_cell(&availability, workday, &calendar),
            colorize_tier(Tier::Orange, " 80")
        );
        assert_eq!(
            percent_cell(&availability, workday, &calendar),
            colorize_tier(Tier::Green, " 80")
        );
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(strip_ansi(&progress_bar(50.0, 10)), "█████░░░░░");
        assert_eq!(strip_ansi(&progress_bar(140.0, 4)), "████");
        assert_eq!(strip_ansi(&progress_bar(-3.0, 4)), "░░░░");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "Mitarbeiter", "Mitarbeiter"), "Mitarbeiter");
        assert_eq!(pluralize(2, "Kolonne", "Kolonnen"), "Kolonnen");
    }
}
