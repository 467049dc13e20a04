use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use planer_core::date_range::DateRange;
use planer_core::dates::{self, format_full, month_name};
use planer_core::grouping::{EmployeeFilter, group_employees};
use planer_core::holidays::HolidayCalendar;
use planer_core::paint::{Brush, PaintAction, paint};
use planer_core::protocol::{SetAbsence, SetAbsenceResponse};
use planer_core::summary::Snapshot;
use planer_core::{AbsenceType, Employee};

use crate::data::{Board, Planer};
use crate::render::{Render, colorize_absence, day_cell, day_header};
use crate::utils::tui::create_spinner;

const NAME_WIDTH: usize = 26;
const CELL_WIDTH: usize = 3;

/// `x`, `clear` or `-` clear a cell, anything else is an absence code.
pub fn parse_brush(s: &str) -> Result<Brush> {
    match s.trim().to_lowercase().as_str() {
        "x" | "clear" | "-" => Ok(Brush::Clear),
        _ => Ok(Brush::Set(s.parse::<AbsenceType>()?)),
    }
}

/// Month grid of absences, one row per employee, grouped.
pub async fn grid(
    planer: &mut Planer,
    calendar: &HolidayCalendar,
    window: DateRange,
    filter: EmployeeFilter,
) -> Result<()> {
    let spinner = create_spinner("Loading absences");
    let result = planer.board(window).await;
    spinner.finish_and_clear();
    let board = result?;

    let today = dates::today();
    let days = window.days();
    let absent_today = board.absences.absent_on(today);
    let groups = group_employees(&board.employees, &filter, &absent_today);

    println!(
        "{}",
        format!("Abwesenheiten {} {}", month_name(window.from.month0() + 1), window.from.year()).bold()
    );
    for line in day_header(&days, today, CELL_WIDTH, NAME_WIDTH + 1) {
        println!("{}", line);
    }

    if groups.is_empty() {
        println!("{}", "No employees found".dimmed());
    }

    let snapshot = board.snapshot(calendar);
    for group in &groups {
        println!("{}", group.name.bold());
        for employee in &group.members {
            println!("{}", row(&board, &snapshot, employee, &days));
        }
    }

    println!();
    println!("{}", legend());

    let holidays = calendar.holidays_between(window.from, window.to);
    if !holidays.is_empty() {
        let names: Vec<String> = holidays
            .iter()
            .map(|(day, name)| format!("{} {}", dates::format_short(*day), name))
            .collect();
        println!("{} {}", "Feiertage:".dimmed(), names.join(", ").dimmed());
    }

    Ok(())
}

fn row(board: &Board, snapshot: &Snapshot, employee: &Employee, days: &[NaiveDate]) -> String {
    let calendar = snapshot.calendar;

    let mut name: String = employee.display_name().chars().take(NAME_WIDTH - 1).collect();
    name = format!(" {:<width$}", name, width = NAME_WIDTH);

    let mut line = name;
    for day in days {
        let kind = board.absences.get(&employee.pers_nr, *day).map(|a| a.kind);
        let cell = if kind.is_none()
            && calendar.is_workday(*day)
            && snapshot.assignment_for(&employee.pers_nr, *day).is_some()
        {
            "▪ ".cyan().to_string()
        } else {
            day_cell(kind, *day, calendar)
        };
        line.push_str(&cell);
        line.push(' ');
    }

    let used = board.absences.vacation_days_used(&employee.pers_nr);
    line.push_str(&format!("U {}/{}", used, employee.leave_days).dimmed().to_string());
    line
}

fn legend() -> String {
    let mut parts: Vec<String> = AbsenceType::ALL
        .iter()
        .map(|kind| format!("{}={}", kind.render(), kind.label()))
        .collect();
    parts.push(format!("{}=Feiertag", "F".dimmed()));
    parts.push(format!("{}=Kolonne eingeplant", "▪".cyan()));
    parts.join("  ")
}

fn report(req: &SetAbsence, resp: &SetAbsenceResponse) {
    let what = match resp {
        SetAbsenceResponse::Created(_) => "Created".green().to_string(),
        _ => "Updated".yellow().to_string(),
    };
    println!(
        "{} {} {} {}",
        what,
        req.kind.render(),
        req.pers_nr,
        format_full(req.date).dimmed()
    );
}

/// Set the absence for one day, or for every working day up to `to`.
pub async fn set(
    planer: &mut Planer,
    calendar: &HolidayCalendar,
    pers_nr: String,
    from: NaiveDate,
    to: Option<NaiveDate>,
    kind: AbsenceType,
) -> Result<()> {
    let Some(to) = to else {
        let req = SetAbsence {
            pers_nr,
            date: from,
            kind,
        };
        req.validate()?;
        let resp = planer.set_absence(&req).await?;
        report(&req, &resp);
        return Ok(());
    };

    let range = DateRange::new(from, to)?;
    let mut skipped = 0;
    for day in range.days() {
        if !calendar.is_workday(day) {
            skipped += 1;
            continue;
        }
        let req = SetAbsence {
            pers_nr: pers_nr.clone(),
            date: day,
            kind,
        };
        req.validate()?;
        let resp = planer.set_absence(&req).await?;
        report(&req, &resp);
    }

    if skipped > 0 {
        println!("{}", format!("Skipped {} weekend/holiday days", skipped).dimmed());
    }
    Ok(())
}

/// Paint one cell: same type toggles off, another type replaces, clear
/// deletes. Weekends and holidays are refused.
pub async fn paint_cell(
    planer: &mut Planer,
    calendar: &HolidayCalendar,
    pers_nr: String,
    day: NaiveDate,
    brush: Brush,
) -> Result<()> {
    let existing = planer.absence_on(&pers_nr, day).await?;

    match paint(existing.as_ref(), brush, day, calendar) {
        PaintAction::Blocked => {
            let reason = calendar.holiday_name(day).unwrap_or("Wochenende");
            anyhow::bail!("{} is not a working day ({})", format_full(day), reason)
        }
        PaintAction::Set(kind) => {
            let req = SetAbsence {
                pers_nr,
                date: day,
                kind,
            };
            let resp = planer.set_absence(&req).await?;
            report(&req, &resp);
        }
        PaintAction::Delete(id) => {
            planer.delete_absence(id).await?;
            println!("{} {} {}", "Removed".red(), pers_nr, format_full(day).dimmed());
        }
        PaintAction::Nothing => println!("{}", "Nothing to clear".dimmed()),
    }

    Ok(())
}

/// Create absences from a JSON array of `{PersNr, Datum, Typ}`.
pub async fn import(planer: &mut Planer, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let items: Vec<SetAbsence> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a list of absences", file.display()))?;

    for item in &items {
        item.validate()?;
    }
    if items.is_empty() {
        println!("{}", "Nothing to import".dimmed());
        return Ok(());
    }

    let spinner = create_spinner(format!("Importing {} absences", items.len()));
    let result = planer.import_absences(&items).await;
    spinner.finish_and_clear();

    let created = result?;
    println!("{} {} absences", "Imported".green(), created.len());
    for absence in created.iter().take(10) {
        println!("   {} {} {}", colorize_absence(absence.kind, absence.kind.code()), absence.pers_nr, absence.date);
    }
    if created.len() > 10 {
        println!("   {}", format!("... and {} more", created.len() - 10).dimmed());
    }
    Ok(())
}
