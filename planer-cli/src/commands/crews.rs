use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::availability::{AbsenceIndex, availability};
use planer_core::date_range::DateRange;
use planer_core::dates::format_full;
use planer_core::grouping::crew_candidates;
use planer_core::holidays::HolidayCalendar;
use planer_core::protocol::{CrewPatch, NewCrew};
use planer_core::{Assignment, Crew};

use crate::data::Planer;
use crate::render::{Render, colorize_absence, pluralize};
use crate::utils::tui::create_spinner;

/// Crews with their members, availability on `day` and current assignment.
pub async fn list(planer: &mut Planer, calendar: &HolidayCalendar, day: NaiveDate) -> Result<()> {
    let spinner = create_spinner("Loading crews");
    let result = async {
        let crews = planer.crews().await?;
        let employees = planer.employees().await?;
        let absences = planer.absences(&DateRange::month_of(day)).await?;
        let assignments = planer.assignments().await?;
        let cost_centers = planer.cost_centers().await?;
        anyhow::Ok((crews, employees, absences, assignments, cost_centers))
    }
    .await;
    spinner.finish_and_clear();
    let (crews, employees, absences, assignments, cost_centers) = result?;

    if crews.is_empty() {
        println!("{}", "No crews found".dimmed());
        return Ok(());
    }

    let index = AbsenceIndex::new(&absences);
    println!("{}", format!("Kolonnen am {}", format_full(day)).dimmed());

    for (i, crew) in crews.iter().enumerate() {
        if i > 0 {
            println!();
        }

        let avail = availability(crew, day, &index, calendar);
        println!("{} {} {}", crew.render(), format!("[{}]", crew.id).dimmed(), avail.render());

        if let Some(assignment) = Assignment::for_crew_on(&assignments, crew.id, day) {
            let site = cost_centers
                .iter()
                .find(|k| k.id == assignment.cost_center_id)
                .map(|k| k.render())
                .unwrap_or_else(|| format!("Kostenstelle {}", assignment.cost_center_id));
            println!(
                "   {} {} {}",
                "→".cyan(),
                site,
                format!("{} - {}", format_full(assignment.from), format_full(assignment.to)).dimmed()
            );
        }

        for member in &crew.members {
            let name = employees
                .iter()
                .find(|e| e.pers_nr == member.pers_nr)
                .map(|e| e.display_name())
                .unwrap_or_else(|| "(unbekannt)".to_string());
            let status = match index.get(&member.pers_nr, day) {
                Some(absence) => colorize_absence(absence.kind, absence.kind.label()),
                None => String::new(),
            };
            println!("   {:<28} {} {}", name, format!("#{:<7}", member.pers_nr).dimmed(), status);
        }

        if crew.members.is_empty() {
            println!("   {}", "No members".dimmed());
        }
    }

    Ok(())
}

pub async fn add(planer: &mut Planer, req: NewCrew) -> Result<()> {
    req.validate()?;
    let crew = planer.create_crew(&req).await?;
    println!("{} {} (Id {})", "Created".green(), crew.render(), crew.id);
    Ok(())
}

pub async fn edit(planer: &mut Planer, id: u64, patch: CrewPatch) -> Result<()> {
    planer.update_crew(id, &patch).await?;
    println!("{} crew {}", "Updated".green(), id);
    Ok(())
}

pub async fn delete(planer: &mut Planer, id: u64) -> Result<()> {
    let crews = planer.crews().await?;
    let crew = find(&crews, id)?;
    let members = crew.members.len();
    let name = crew.name.clone();

    planer.delete_crew(id).await?;
    println!(
        "{} {} and {} {}",
        "Deleted".red(),
        name,
        members,
        pluralize(members, "membership", "memberships")
    );
    Ok(())
}

pub async fn add_member(planer: &mut Planer, crew_id: u64, pers_nr: String) -> Result<()> {
    let crews = planer.crews().await?;
    let crew = find(&crews, crew_id)?;
    if crew.has_member(&pers_nr) {
        anyhow::bail!("{} is already a member of {}", pers_nr, crew.name);
    }
    if let Some(other) = Crew::of_person(&crews, &pers_nr) {
        println!("{}", format!("{} is also in {}", pers_nr, other.name).yellow());
    }
    let name = crew.name.clone();

    planer.add_member(crew_id, &pers_nr).await?;
    println!("{} {} to {}", "Added".green(), pers_nr, name);
    Ok(())
}

pub async fn remove_member(planer: &mut Planer, crew_id: u64, pers_nr: String) -> Result<()> {
    planer.remove_member(crew_id, &pers_nr).await?;
    println!("{} {} from crew {}", "Removed".red(), pers_nr, crew_id);
    Ok(())
}

/// Employees that may join a crew, with the crew they are in now.
pub async fn candidates(planer: &mut Planer, search: Option<&str>) -> Result<()> {
    let employees = planer.employees().await?;
    let crews = planer.crews().await?;

    let candidates = crew_candidates(&employees, search);
    if candidates.is_empty() {
        println!("{}", "No matching employees".dimmed());
        return Ok(());
    }

    for employee in candidates {
        let current = Crew::of_person(&crews, &employee.pers_nr)
            .map(|c| c.name.as_str())
            .unwrap_or("");
        println!(
            "{:<28} {} {:<20} {}",
            employee.display_name(),
            format!("#{:<7}", employee.pers_nr).dimmed(),
            employee.group,
            current.cyan()
        );
    }
    Ok(())
}

fn find(crews: &[Crew], id: u64) -> Result<&Crew> {
    crews
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow::anyhow!("Crew {} not found", id))
}
