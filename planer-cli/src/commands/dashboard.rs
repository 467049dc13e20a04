use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::date_range::DateRange;
use planer_core::dates::{format_full, weekday_short};
use planer_core::holidays::HolidayCalendar;
use planer_core::summary::DaySummary;

use crate::data::Planer;
use crate::render::{Render, colorize_absence, pluralize};
use crate::utils::tui::create_spinner;

fn kpi(label: &str, value: impl std::fmt::Display) -> String {
    format!("{} {}", format!("{:<22}", label).dimmed(), value.bold())
}

/// Key figures, absences and running assignments for one day.
pub async fn run(planer: &mut Planer, calendar: &HolidayCalendar, day: NaiveDate) -> Result<()> {
    let spinner = create_spinner("Loading dashboard");
    let result = planer.board(DateRange::month_of(day)).await;
    spinner.finish_and_clear();
    let board = result?;

    let snapshot = board.snapshot(calendar);
    let summary = snapshot.day_summary(day);

    print_header(&summary);
    print_kpis(&summary);
    print_absent(&summary);
    print_assignments(&summary);

    Ok(())
}

fn print_header(summary: &DaySummary) {
    let mut title = format!("Dashboard {} {}", weekday_short(summary.day), format_full(summary.day));
    if let Some(holiday) = summary.holiday {
        title.push_str(&format!(" ({})", holiday));
    }
    println!("{}", title.bold());
    println!();
}

fn print_kpis(summary: &DaySummary) {
    println!("{}", kpi("Mitarbeiter aktiv", summary.active_employees));
    println!("{}", kpi("Verfügbar", summary.capacity.render()));
    println!("{}", kpi("Urlaub", summary.vacation));
    println!("{}", kpi("Krank", summary.sick));
    println!("{}", kpi("Kostenstellen aktiv", summary.active_cost_centers));
    println!("{}", kpi("In Kolonnen", summary.crew_members));
    println!("{}", kpi("Gewerke", summary.timeline_items));
}

fn print_absent(summary: &DaySummary) {
    let count = summary.absent.len();
    println!();
    println!(
        "{} {}",
        "Abwesend".bold(),
        format!("({} {})", count, pluralize(count, "Person", "Personen")).dimmed()
    );
    if summary.absent.is_empty() {
        println!("   {}", "Niemand abwesend".dimmed());
        return;
    }
    for absent in &summary.absent {
        let crew = absent.crew.map(|c| c.name.as_str()).unwrap_or("");
        println!(
            "   {} {:<28} {}",
            colorize_absence(absent.kind, &format!("{:<14}", absent.kind.label())),
            absent.employee.display_name(),
            crew.cyan()
        );
    }
}

fn print_assignments(summary: &DaySummary) {
    println!();
    println!("{}", "Einsätze heute".bold());
    if summary.assignments.is_empty() {
        println!("   {}", "No assignments".dimmed());
        return;
    }
    for active in &summary.assignments {
        let crew = active
            .crew
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Kolonne {}", active.assignment.crew_id));
        let site = active
            .cost_center
            .map(|k| k.render())
            .unwrap_or_else(|| format!("Kostenstelle {}", active.assignment.cost_center_id));
        println!("   {:<24} {} {}", crew, active.availability.render(), site);
    }
}
