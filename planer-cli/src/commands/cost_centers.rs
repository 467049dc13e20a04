use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::availability::AbsenceIndex;
use planer_core::date_range::DateRange;
use planer_core::dates::format_full;
use planer_core::holidays::HolidayCalendar;
use planer_core::protocol::CostCenterPatch;
use planer_core::{Assignment, CostCenter};

use crate::data::Planer;
use crate::render::{Render, progress_bar};
use crate::utils::tui::create_spinner;

fn period(cost_center: &CostCenter) -> String {
    match (cost_center.start, cost_center.end) {
        (Some(start), Some(end)) => format!("{} - {}", format_full(start), format_full(end)),
        (Some(start), None) => format!("ab {}", format_full(start)),
        (None, Some(end)) => format!("bis {}", format_full(end)),
        (None, None) => String::new(),
    }
}

/// Cost centers, active ones only unless `all`. Sites with a crew on `day`
/// are marked.
pub async fn list(planer: &mut Planer, day: NaiveDate, all: bool) -> Result<()> {
    let cost_centers = planer.cost_centers().await?;
    let assignments = planer.assignments().await?;

    let shown: Vec<&CostCenter> = cost_centers.iter().filter(|k| all || k.active).collect();
    if shown.is_empty() {
        println!("{}", "No cost centers found".dimmed());
        return Ok(());
    }

    let busy: Vec<u64> = Assignment::active_on(&assignments, day)
        .iter()
        .map(|a| a.cost_center_id)
        .collect();

    for cost_center in shown {
        let marker = if busy.contains(&cost_center.id) {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        let inactive = if cost_center.active {
            String::new()
        } else {
            "(inaktiv)".dimmed().to_string()
        };

        println!(
            "{} {} {} {}",
            marker,
            format!("[{:>3}]", cost_center.id).dimmed(),
            cost_center.render(),
            inactive
        );

        let people: Vec<String> = [
            cost_center.site_manager.as_ref().map(|m| format!("Bauleiter: {}", m)),
            cost_center.client.as_ref().map(|c| format!("Auftraggeber: {}", c)),
        ]
        .into_iter()
        .flatten()
        .collect();
        let period = period(cost_center);

        if !people.is_empty() || !period.is_empty() {
            let mut details = people;
            if !period.is_empty() {
                details.push(period);
            }
            println!("        {}", details.join("  ").dimmed());
        }
    }

    Ok(())
}

/// One cost center with its assignments and timeline items.
pub async fn show(planer: &mut Planer, calendar: &HolidayCalendar, id: u64, day: NaiveDate) -> Result<()> {
    let spinner = create_spinner("Loading cost center");
    let result = async {
        let cost_centers = planer.cost_centers().await?;
        let assignments = planer.assignments().await?;
        let crews = planer.crews().await?;
        let absences = planer.absences(&DateRange::month_of(day)).await?;
        anyhow::Ok((cost_centers, assignments, crews, absences))
    }
    .await;
    spinner.finish_and_clear();
    let (cost_centers, assignments, crews, absences) = result?;

    let cost_center = cost_centers
        .iter()
        .find(|k| k.id == id)
        .ok_or_else(|| anyhow::anyhow!("Cost center {} not found", id))?;
    let timeline = planer.timeline(Some(cost_center.number())).await?;

    println!("{}", cost_center.render().bold());
    if let Some(manager) = &cost_center.site_manager {
        println!("   Bauleiter     {}", manager);
    }
    if let Some(client) = &cost_center.client {
        println!("   Auftraggeber  {}", client);
    }
    let period = period(cost_center);
    if !period.is_empty() {
        println!("   Zeitraum      {}", period);
    }
    if !cost_center.active {
        println!("   {}", "inaktiv".dimmed());
    }

    let index = AbsenceIndex::new(&absences);
    let mine: Vec<&Assignment> = assignments.iter().filter(|a| a.cost_center_id == id).collect();

    println!();
    println!("{}", "Einsätze".bold());
    if mine.is_empty() {
        println!("   {}", "No assignments".dimmed());
    }
    for assignment in mine {
        let dates = format!("{} - {}", format_full(assignment.from), format_full(assignment.to));
        match crews.iter().find(|c| c.id == assignment.crew_id) {
            Some(crew) => {
                let now = if assignment.is_active_on(day) {
                    planer_core::availability::availability(crew, day, &index, calendar).render()
                } else {
                    String::new()
                };
                println!("   {:<24} {} {}", crew.name, dates.dimmed(), now);
            }
            None => println!("   {:<24} {}", format!("Kolonne {}", assignment.crew_id), dates.dimmed()),
        }
    }

    println!();
    println!("{}", "Bauzeitenplan".bold());
    if timeline.is_empty() {
        println!("   {}", "No timeline items".dimmed());
    }
    for item in &timeline {
        let progress = item.progress.unwrap_or(0.0);
        println!(
            "   {:<28} {} {:>3.0}%",
            item.title,
            progress_bar(progress, 20),
            progress.clamp(0.0, 100.0)
        );
    }

    Ok(())
}

pub async fn edit(planer: &mut Planer, id: u64, patch: CostCenterPatch) -> Result<()> {
    if let (Some(start), Some(end)) = (patch.start, patch.end) {
        DateRange::new(start, end)?;
    }
    planer.update_cost_center(id, &patch).await?;
    println!("{} cost center {}", "Updated".green(), id);
    Ok(())
}
