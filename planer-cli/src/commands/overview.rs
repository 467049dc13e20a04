use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::date_range::DateRange;
use planer_core::dates::{format_short, monday_of, week_dates, week_number};
use planer_core::holidays::HolidayCalendar;
use planer_core::Assignment;

use crate::commands::OVERVIEW_WEEKS;
use crate::data::Planer;
use crate::render::{Render, pluralize};
use crate::utils::tui::create_spinner;

const LABEL_WIDTH: usize = 24;

/// The weeks shown for `day`, starting on its Monday.
fn window_for(day: NaiveDate) -> Result<DateRange> {
    let days = week_dates(monday_of(day), OVERVIEW_WEEKS);
    match (days.first(), days.last()) {
        (Some(from), Some(to)) => Ok(DateRange::new(*from, *to)?),
        _ => anyhow::bail!("Empty overview window"),
    }
}

/// One character per day: assigned workdays filled, weekends and holidays dotted.
fn strip(assignment: &Assignment, days: &[NaiveDate], calendar: &HolidayCalendar) -> String {
    days.iter()
        .map(|day| {
            if !calendar.is_workday(*day) {
                "·".dimmed().to_string()
            } else if assignment.is_active_on(*day) {
                "█".cyan().to_string()
            } else {
                " ".to_string()
            }
        })
        .collect()
}

fn week_labels(days: &[NaiveDate]) -> String {
    let mut line = format!("{:width$}", "", width = LABEL_WIDTH + 3);
    for monday in days.iter().step_by(7) {
        line.push_str(&format!("{:<7}", format!("KW{}", week_number(*monday))));
    }
    line.dimmed().to_string()
}

/// Cost centers with crews scheduled in the coming weeks.
pub async fn run(planer: &mut Planer, calendar: &HolidayCalendar, day: NaiveDate) -> Result<()> {
    let window = window_for(day)?;

    let spinner = create_spinner("Loading overview");
    let result = planer.board(window).await;
    spinner.finish_and_clear();
    let board = result?;

    let snapshot = board.snapshot(calendar);
    let days = board.window.days();
    let cards = snapshot.project_overview(&board.window, day);

    let crews_busy: usize = {
        let mut ids: Vec<u64> = cards
            .iter()
            .flat_map(|card| card.assignments.iter().map(|(a, _)| a.crew_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    };
    let members: usize = cards.iter().map(|c| c.members).sum();
    let absent: usize = cards.iter().map(|c| c.absent_members).sum();

    println!(
        "{}",
        format!(
            "Übersicht {} - {}",
            format_short(board.window.from),
            format_short(board.window.to)
        )
        .bold()
    );
    println!(
        "{} {}   {} {}   {} {}   {} {}",
        "Projekte".dimmed(),
        snapshot.active_cost_center_ids(&board.window).len().bold(),
        "Kolonnen".dimmed(),
        crews_busy.bold(),
        "Mitarbeiter".dimmed(),
        members.bold(),
        "heute abwesend".dimmed(),
        absent.bold()
    );

    if cards.is_empty() {
        println!();
        println!("{}", "No assignments in this period".dimmed());
        return Ok(());
    }

    println!();
    println!("{}", week_labels(&days));

    for card in &cards {
        let count = card.assignments.len();
        println!(
            "{} {}",
            card.cost_center.render().bold(),
            format!(
                "({} {}, {}/{} anwesend)",
                count,
                pluralize(count, "Einsatz", "Einsätze"),
                card.members - card.absent_members,
                card.members
            )
            .dimmed()
        );

        for (assignment, crew) in &card.assignments {
            let name = crew
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Kolonne {}", assignment.crew_id));
            let label: String = name.chars().take(LABEL_WIDTH).collect();
            println!("   {:<width$}{}", label, strip(assignment, &days, calendar), width = LABEL_WIDTH);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip_ansi;
    use planer_core::dates::parse_day;

    #[test]
    fn test_window_starts_on_monday() {
        let window = window_for(parse_day("2026-03-11").unwrap()).unwrap();
        assert_eq!(window.from, parse_day("2026-03-09").unwrap());
        assert_eq!(window.to, parse_day("2026-04-05").unwrap());
        assert_eq!(window.len_days(), 28);
    }

    #[test]
    fn test_strip() {
        let calendar = HolidayCalendar::default();
        let days = week_dates(parse_day("2026-03-09").unwrap(), 1);
        let assignment = Assignment {
            id: 1,
            title: Assignment::default_title(1, 1),
            crew_id: 1,
            cost_center_id: 1,
            from: parse_day("2026-03-10").unwrap(),
            to: parse_day("2026-03-12").unwrap(),
        };
        assert_eq!(strip_ansi(&strip(&assignment, &days, &calendar)), " ███ ··");
    }
}
