use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::dates::format_full;
use planer_core::protocol::{AssignmentPatch, NewAssignment};
use planer_core::{Assignment, CostCenter, Crew};

use crate::data::Planer;
use crate::render::Render;

fn describe(assignment: &Assignment, crews: &[Crew], cost_centers: &[CostCenter]) -> String {
    let crew = crews
        .iter()
        .find(|c| c.id == assignment.crew_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("Kolonne {}", assignment.crew_id));
    let site = cost_centers
        .iter()
        .find(|k| k.id == assignment.cost_center_id)
        .map(|k| k.render())
        .unwrap_or_else(|| format!("Kostenstelle {}", assignment.cost_center_id));

    format!(
        "{} {:<20} {} {}",
        format!("[{}]", assignment.id).dimmed(),
        crew,
        site,
        format!("{} - {}", format_full(assignment.from), format_full(assignment.to)).dimmed()
    )
}

/// All assignments, or only those active on `day`.
pub async fn list(planer: &mut Planer, day: Option<NaiveDate>) -> Result<()> {
    let assignments = planer.assignments().await?;
    let crews = planer.crews().await?;
    let cost_centers = planer.cost_centers().await?;

    let shown: Vec<&Assignment> = match day {
        Some(day) => Assignment::active_on(&assignments, day),
        None => assignments.iter().collect(),
    };

    if shown.is_empty() {
        println!("{}", "No assignments found".dimmed());
        return Ok(());
    }

    for assignment in shown {
        println!("{}", describe(assignment, &crews, &cost_centers));
    }
    Ok(())
}

/// Overlaps with existing assignments of the crew are allowed and only
/// reported.
pub async fn add(planer: &mut Planer, req: NewAssignment) -> Result<()> {
    req.validate()?;

    let existing = planer.assignments().await?;
    let range = planer_core::date_range::DateRange::new(req.from, req.to)?;
    let overlapping = existing
        .iter()
        .filter(|a| a.crew_id == req.crew_id && a.overlaps(&range))
        .count();

    let assignment = planer.create_assignment(&req).await?;
    let crews = planer.crews().await?;
    let cost_centers = planer.cost_centers().await?;

    println!("{} {}", "Created".green(), describe(&assignment, &crews, &cost_centers));
    if overlapping > 0 {
        println!(
            "{}",
            format!("Crew already has {} assignment(s) in this period", overlapping).yellow()
        );
    }
    Ok(())
}

pub async fn edit(planer: &mut Planer, id: u64, patch: AssignmentPatch) -> Result<()> {
    patch.validate()?;
    planer.update_assignment(id, &patch).await?;
    println!("{} assignment {}", "Updated".green(), id);
    Ok(())
}

pub async fn delete(planer: &mut Planer, id: u64) -> Result<()> {
    planer.delete_assignment(id).await?;
    println!("{} assignment {}", "Deleted".red(), id);
    Ok(())
}
