use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use planer_core::availability::AbsenceIndex;
use planer_core::date_range::DateRange;
use planer_core::dates;
use planer_core::grouping::{EmployeeFilter, group_employees};
use planer_core::protocol::{EmployeePatch, NewEmployee};

use crate::data::Planer;
use crate::render::{Render, colorize_absence, pluralize};
use crate::utils::tui::create_spinner;

/// The calendar year containing `day`.
fn year_of(day: NaiveDate) -> Result<DateRange> {
    let from = NaiveDate::from_ymd_opt(day.year(), 1, 1);
    let to = NaiveDate::from_ymd_opt(day.year(), 12, 31);
    match (from, to) {
        (Some(from), Some(to)) => Ok(DateRange::new(from, to)?),
        _ => anyhow::bail!("Invalid year {}", day.year()),
    }
}

/// Active employees by group, with today's absence and the vacation days
/// taken this year.
pub async fn list(planer: &mut Planer, filter: EmployeeFilter) -> Result<()> {
    let today = dates::today();

    let spinner = create_spinner("Loading employees");
    let result = async {
        let employees = planer.employees().await?;
        let absences = planer.absences(&year_of(today)?).await?;
        let crews = planer.crews().await?;
        anyhow::Ok((employees, absences, crews))
    }
    .await;
    spinner.finish_and_clear();
    let (employees, absences, crews) = result?;

    let index = AbsenceIndex::new(&absences);
    let absent_today = index.absent_on(today);
    let groups = group_employees(&employees, &filter, &absent_today);

    if groups.is_empty() {
        println!("{}", "No employees found".dimmed());
        return Ok(());
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let count = group.members.len();
        println!(
            "{} {}",
            group.name.bold(),
            format!("({} {})", count, pluralize(count, "Person", "Personen")).dimmed()
        );

        for employee in &group.members {
            let today_cell = match index.get(&employee.pers_nr, today) {
                Some(absence) => colorize_absence(absence.kind, &format!("{:<2}", absence.kind.code())),
                None => "  ".to_string(),
            };
            let crew = planer_core::Crew::of_person(&crews, &employee.pers_nr)
                .map(|c| c.name.as_str())
                .unwrap_or("");
            let vacation = format!(
                "Urlaub {}/{}",
                index.vacation_days_used(&employee.pers_nr),
                employee.leave_days
            );

            println!(
                "   {} {:<28} {} {} {}",
                today_cell,
                employee.display_name(),
                format!("#{:<7}", employee.pers_nr).dimmed(),
                format!("{:<20}", crew).cyan(),
                vacation.dimmed()
            );
        }
    }

    Ok(())
}

pub async fn add(planer: &mut Planer, req: NewEmployee) -> Result<()> {
    req.validate()?;
    let employee = planer.create_employee(&req).await?;
    println!("{} {} (Id {})", "Created".green(), employee.render(), employee.id);
    Ok(())
}

pub async fn edit(planer: &mut Planer, id: u64, patch: EmployeePatch) -> Result<()> {
    planer.update_employee(id, &patch).await?;
    println!("{} employee {}", "Updated".green(), id);
    Ok(())
}
