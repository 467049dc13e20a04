mod cache;
mod client;
mod commands;
mod config;
mod data;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planer_core::AbsenceType;
use planer_core::dates::parse_day;
use planer_core::grouping::{EmployeeFilter, Presence};
use planer_core::protocol::{
    AssignmentPatch, CostCenterPatch, CrewPatch, EmployeePatch, NewAssignment, NewCrew,
    NewEmployee, NewTimelineItem, TimelinePatch,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cache::QueryCache;
use crate::client::Client;
use crate::commands::{day_arg, month_arg};
use crate::config::CliConfig;
use crate::data::Planer;

#[derive(Parser)]
#[command(name = "planer")]
#[command(about = "Plan absences, crews and construction sites from the terminal")]
struct Cli {
    /// Proxy server URL (overrides cli.toml and PLANER_SERVER)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Log requests and cache decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ignore cached responses
    #[arg(long, global = true)]
    fresh: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the proxy and its SharePoint connection
    Health,
    /// Key figures for one day
    Dashboard {
        /// Day to show (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Sites with crews scheduled in the coming weeks
    Overview {
        /// Any day of the first week (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Crew availability per day for a month
    Planning {
        /// Month to show (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    #[command(subcommand)]
    Employees(EmployeeCommands),
    #[command(subcommand)]
    Absences(AbsenceCommands),
    #[command(subcommand)]
    Crews(CrewCommands),
    #[command(subcommand)]
    Assignments(AssignmentCommands),
    #[command(subcommand)]
    CostCenters(CostCenterCommands),
    #[command(subcommand)]
    Timeline(TimelineCommands),
}

#[derive(Subcommand)]
enum EmployeeCommands {
    /// Active employees by group
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Add {
        /// Last name
        name: String,
        #[arg(long)]
        pers_nr: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Vacation allowance per year
        #[arg(long)]
        leave_days: Option<u32>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        pers_nr: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        leave_days: Option<u32>,
        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Match name or personnel number
    #[arg(short, long)]
    search: Option<String>,

    /// Only this group
    #[arg(short, long)]
    group: Option<String>,

    /// Only people present today
    #[arg(long, conflicts_with = "absent")]
    available: bool,

    /// Only people absent today
    #[arg(long)]
    absent: bool,
}

impl FilterArgs {
    fn into_filter(self) -> EmployeeFilter {
        let presence = match (self.available, self.absent) {
            (true, _) => Some(Presence::Available),
            (_, true) => Some(Presence::Absent),
            _ => None,
        };
        EmployeeFilter {
            search: self.search,
            group: self.group,
            presence,
            active_only: true,
        }
    }
}

#[derive(Subcommand)]
enum AbsenceCommands {
    /// Month grid of absences
    Grid {
        /// Month to show (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Set an absence for a day or a range of working days
    Set {
        pers_nr: String,
        /// Absence code (U, K, FE, P, S, H, UN, BU)
        kind: AbsenceType,
        #[arg(long, value_parser = date_value)]
        from: NaiveDate,
        /// Last day of the range
        #[arg(long, value_parser = date_value)]
        to: Option<NaiveDate>,
    },
    /// Paint one cell of the grid: a code sets or toggles, x clears
    Paint {
        pers_nr: String,
        #[arg(value_parser = date_value)]
        date: NaiveDate,
        brush: String,
    },
    /// Create absences from a JSON file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum CrewCommands {
    /// Crews with members and availability
    List {
        #[arg(long)]
        date: Option<String>,
    },
    Add {
        name: String,
        #[arg(long)]
        foreman: Option<String>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        foreman: Option<String>,
    },
    /// Delete a crew and its memberships
    Delete { id: u64 },
    AddMember { crew_id: u64, pers_nr: String },
    RemoveMember { crew_id: u64, pers_nr: String },
    /// Employees that can be added to crews
    Candidates {
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum AssignmentCommands {
    List {
        /// Only assignments running on this day (YYYY-MM-DD)
        #[arg(long, value_parser = date_value)]
        date: Option<NaiveDate>,
    },
    Add {
        crew_id: u64,
        cost_center_id: u64,
        #[arg(long, value_parser = date_value)]
        from: NaiveDate,
        #[arg(long, value_parser = date_value)]
        to: NaiveDate,
        #[arg(long)]
        title: Option<String>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        crew_id: Option<u64>,
        #[arg(long)]
        cost_center_id: Option<u64>,
        #[arg(long, value_parser = date_value)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_value)]
        to: Option<NaiveDate>,
        #[arg(long)]
        title: Option<String>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum CostCenterCommands {
    List {
        /// Include inactive cost centers
        #[arg(short, long)]
        all: bool,
    },
    Show {
        id: u64,
        #[arg(long)]
        date: Option<String>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        site_manager: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long, value_parser = date_value)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = date_value)]
        end: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum TimelineCommands {
    List {
        /// Cost center number
        #[arg(long)]
        kst: Option<String>,
    },
    Add {
        title: String,
        #[arg(long)]
        kst: Option<String>,
        #[arg(long, value_parser = date_value)]
        start: NaiveDate,
        #[arg(long, value_parser = date_value)]
        end: NaiveDate,
        /// Progress in percent
        #[arg(long)]
        progress: Option<f64>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        kst: Option<String>,
        #[arg(long, value_parser = date_value)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = date_value)]
        end: Option<NaiveDate>,
        #[arg(long)]
        progress: Option<f64>,
    },
    Delete { id: u64 },
}

fn date_value(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "planer=debug" } else { "planer=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::load(cli.server)?;
    let calendar = config.calendar()?;
    let client = Client::new(&config.server)?;

    let mut cache = match CliConfig::cache_path() {
        Ok(path) => QueryCache::load(&path),
        Err(e) => {
            warn!("{:#}, caching for this run only", e);
            QueryCache::in_memory()
        }
    };
    if cli.fresh {
        cache.clear();
    }
    debug!("{} cached queries", cache.len());

    let mut planer = Planer::new(client, cache);
    let result = run(&mut planer, &calendar, cli.command).await;
    planer.finish()?;
    result
}

async fn run(
    planer: &mut Planer,
    calendar: &planer_core::holidays::HolidayCalendar,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Health => commands::health::run(planer).await,
        Commands::Dashboard { date } => {
            commands::dashboard::run(planer, calendar, day_arg(date.as_deref())?).await
        }
        Commands::Overview { date } => {
            commands::overview::run(planer, calendar, day_arg(date.as_deref())?).await
        }
        Commands::Planning { month } => {
            commands::planning::run(planer, calendar, month_arg(month.as_deref())?).await
        }

        Commands::Employees(cmd) => match cmd {
            EmployeeCommands::List { filter } => {
                commands::employees::list(planer, filter.into_filter()).await
            }
            EmployeeCommands::Add {
                name,
                pers_nr,
                group,
                first_name,
                notes,
                leave_days,
            } => {
                let req = NewEmployee {
                    name,
                    pers_nr,
                    group,
                    first_name,
                    notes,
                    leave_days,
                };
                commands::employees::add(planer, req).await
            }
            EmployeeCommands::Edit {
                id,
                name,
                pers_nr,
                first_name,
                group,
                notes,
                leave_days,
                active,
            } => {
                let patch = EmployeePatch {
                    name,
                    pers_nr,
                    first_name,
                    group,
                    notes,
                    leave_days,
                    active,
                };
                commands::employees::edit(planer, id, patch).await
            }
        },

        Commands::Absences(cmd) => match cmd {
            AbsenceCommands::Grid { month, filter } => {
                let window = month_arg(month.as_deref())?;
                commands::absences::grid(planer, calendar, window, filter.into_filter()).await
            }
            AbsenceCommands::Set {
                pers_nr,
                kind,
                from,
                to,
            } => commands::absences::set(planer, calendar, pers_nr, from, to, kind).await,
            AbsenceCommands::Paint {
                pers_nr,
                date,
                brush,
            } => {
                let brush = commands::absences::parse_brush(&brush)?;
                commands::absences::paint_cell(planer, calendar, pers_nr, date, brush).await
            }
            AbsenceCommands::Import { file } => commands::absences::import(planer, &file).await,
        },

        Commands::Crews(cmd) => match cmd {
            CrewCommands::List { date } => {
                commands::crews::list(planer, calendar, day_arg(date.as_deref())?).await
            }
            CrewCommands::Add { name, foreman } => {
                commands::crews::add(planer, NewCrew { name, foreman }).await
            }
            CrewCommands::Edit { id, name, foreman } => {
                commands::crews::edit(planer, id, CrewPatch { name, foreman }).await
            }
            CrewCommands::Delete { id } => commands::crews::delete(planer, id).await,
            CrewCommands::AddMember { crew_id, pers_nr } => {
                commands::crews::add_member(planer, crew_id, pers_nr).await
            }
            CrewCommands::RemoveMember { crew_id, pers_nr } => {
                commands::crews::remove_member(planer, crew_id, pers_nr).await
            }
            CrewCommands::Candidates { search } => {
                commands::crews::candidates(planer, search.as_deref()).await
            }
        },

        Commands::Assignments(cmd) => match cmd {
            AssignmentCommands::List { date } => commands::assignments::list(planer, date).await,
            AssignmentCommands::Add {
                crew_id,
                cost_center_id,
                from,
                to,
                title,
            } => {
                let req = NewAssignment {
                    title,
                    crew_id,
                    cost_center_id,
                    from,
                    to,
                };
                commands::assignments::add(planer, req).await
            }
            AssignmentCommands::Edit {
                id,
                crew_id,
                cost_center_id,
                from,
                to,
                title,
            } => {
                let patch = AssignmentPatch {
                    title,
                    crew_id,
                    cost_center_id,
                    from,
                    to,
                };
                commands::assignments::edit(planer, id, patch).await
            }
            AssignmentCommands::Delete { id } => commands::assignments::delete(planer, id).await,
        },

        Commands::CostCenters(cmd) => match cmd {
            CostCenterCommands::List { all } => {
                commands::cost_centers::list(planer, planer_core::dates::today(), all).await
            }
            CostCenterCommands::Show { id, date } => {
                commands::cost_centers::show(planer, calendar, id, day_arg(date.as_deref())?).await
            }
            CostCenterCommands::Edit {
                id,
                title,
                active,
                site_manager,
                client,
                start,
                end,
            } => {
                let patch = CostCenterPatch {
                    title,
                    active,
                    site_manager,
                    client,
                    start,
                    end,
                };
                commands::cost_centers::edit(planer, id, patch).await
            }
        },

        Commands::Timeline(cmd) => match cmd {
            TimelineCommands::List { kst } => {
                commands::timeline::list(planer, kst.as_deref(), planer_core::dates::today()).await
            }
            TimelineCommands::Add {
                title,
                kst,
                start,
                end,
                progress,
            } => {
                let req = NewTimelineItem {
                    title,
                    cost_center_nr: kst,
                    start,
                    end,
                    progress,
                };
                commands::timeline::add(planer, req).await
            }
            TimelineCommands::Edit {
                id,
                title,
                kst,
                start,
                end,
                progress,
            } => {
                let patch = TimelinePatch {
                    title,
                    cost_center_nr: kst,
                    start,
                    end,
                    progress,
                };
                commands::timeline::edit(planer, id, patch).await
            }
            TimelineCommands::Delete { id } => commands::timeline::delete(planer, id).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_absence_set() {
        let cli = Cli::parse_from([
            "planer", "absences", "set", "4711", "K", "--from", "2026-03-10", "--to", "2026-03-13",
        ]);
        match cli.command {
            Commands::Absences(AbsenceCommands::Set { pers_nr, kind, from, to }) => {
                assert_eq!(pers_nr, "4711");
                assert_eq!(kind, AbsenceType::Sick);
                assert_eq!(from, parse_day("2026-03-10").unwrap());
                assert_eq!(to, Some(parse_day("2026-03-13").unwrap()));
            }
            _ => panic!("expected absences set"),
        }
    }

    #[test]
    fn test_filter_args() {
        let cli = Cli::parse_from(["planer", "employees", "list", "--absent", "-g", "Maurer"]);
        let Commands::Employees(EmployeeCommands::List { filter }) = cli.command else {
            panic!("expected employees list");
        };
        let filter = filter.into_filter();
        assert_eq!(filter.presence, Some(Presence::Absent));
        assert_eq!(filter.group.as_deref(), Some("Maurer"));
        assert!(filter.active_only);
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["planer", "assignments", "list", "--date", "10.03.2026"]).is_err());
    }
}
