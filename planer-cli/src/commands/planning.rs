use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use planer_core::availability::Availability;
use planer_core::date_range::DateRange;
use planer_core::dates::{self, month_name};
use planer_core::holidays::HolidayCalendar;
use planer_core::summary::Snapshot;

use crate::data::Planer;
use crate::render::{colorize_tier, day_header, exact_percent_cell, percent_cell};
use crate::utils::tui::create_spinner;

const LABEL_WIDTH: usize = 22;
const CELL_WIDTH: usize = 4;

/// Availability of every crew together; crews without members add nothing.
fn combined(snapshot: &Snapshot, day: NaiveDate) -> Availability {
    let (total, available) = snapshot
        .crews
        .iter()
        .map(|crew| snapshot.crew_availability(crew.id, day))
        .fold((0, 0), |(t, a), avail| (t + avail.total, a + avail.available));
    Availability::new(total, available)
}

/// Crew by day matrix of available members in percent.
pub async fn run(planer: &mut Planer, calendar: &HolidayCalendar, window: DateRange) -> Result<()> {
    let spinner = create_spinner("Loading planning");
    let result = planer.board(window).await;
    spinner.finish_and_clear();
    let board = result?;

    let snapshot = board.snapshot(calendar);
    let days = board.window.days();

    println!(
        "{}",
        format!("Planung {} {}", month_name(window.from.month0() + 1), window.from.year()).bold()
    );
    for line in day_header(&days, dates::today(), CELL_WIDTH, LABEL_WIDTH) {
        println!("{}", line);
    }

    if board.crews.is_empty() {
        println!("{}", "No crews found".dimmed());
        return Ok(());
    }

    for crew in &board.crews {
        let name: String = crew.name.chars().take(LABEL_WIDTH - 1).collect();
        let mut line = format!("{:<width$}", name, width = LABEL_WIDTH);
        for day in &days {
            let avail = snapshot.crew_availability(crew.id, *day);
            line.push_str(&percent_cell(&avail, *day, calendar));
            line.push(' ');
        }
        println!("{}", line);
    }

    let mut line = format!("{:<width$}", "Gesamt", width = LABEL_WIDTH).bold().to_string();
    for day in &days {
        line.push_str(&exact_percent_cell(&combined(&snapshot, *day), *day, calendar));
        line.push(' ');
    }
    println!("{}", line);

    println!();
    println!(
        "{}  {}  {}",
        colorize_tier(planer_core::availability::Tier::Green, "≥80%"),
        colorize_tier(planer_core::availability::Tier::Orange, "≥50%"),
        colorize_tier(planer_core::availability::Tier::Red, "<50%")
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planer_core::availability::AbsenceIndex;
    use planer_core::dates::parse_day;
    use planer_core::{Absence, AbsenceType, Crew, CrewMember};

    fn crew(id: u64, members: &[&str]) -> Crew {
        Crew {
            id,
            name: format!("Kolonne {}", id),
            foreman: None,
            members: members
                .iter()
                .enumerate()
                .map(|(i, p)| CrewMember {
                    id: id * 10 + i as u64,
                    crew_id: id,
                    pers_nr: p.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_combined_availability() {
        let day = parse_day("2026-03-10").unwrap();
        let crews = vec![crew(1, &["100", "101"]), crew(2, &["200", "201"]), crew(3, &[])];
        let absences = vec![Absence {
            id: 1,
            title: Absence::natural_key("101", day),
            pers_nr: "101".into(),
            date: day,
            kind: AbsenceType::Sick,
        }];
        let index = AbsenceIndex::new(&absences);
        let calendar = HolidayCalendar::default();
        let snapshot = Snapshot {
            employees: &[],
            absences: &index,
            crews: &crews,
            assignments: &[],
            cost_centers: &[],
            timeline: &[],
            calendar: &calendar,
        };

        let avail = combined(&snapshot, day);
        assert_eq!(avail.total, 4);
        assert_eq!(avail.available, 3);
        assert_eq!(avail.percent, 75);
        assert_eq!(avail.exact_tier(), planer_core::availability::Tier::Orange);
    }
}
