use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planer_core::dates::format_full;
use planer_core::protocol::{NewTimelineItem, TimelinePatch};
use planer_core::TimelineItem;

use crate::data::Planer;
use crate::render::progress_bar;

const BAR_WIDTH: usize = 20;

fn dates(item: &TimelineItem) -> String {
    match (item.start, item.end) {
        (Some(start), Some(end)) => format!("{} - {}", format_full(start), format_full(end)),
        (Some(start), None) => format!("ab {}", format_full(start)),
        _ => "ohne Termin".to_string(),
    }
}

/// Items sorted by start, undated ones last.
fn sorted(items: &[TimelineItem]) -> Vec<&TimelineItem> {
    let mut items: Vec<&TimelineItem> = items.iter().collect();
    items.sort_by_key(|item| (item.start.is_none(), item.start, item.id));
    items
}

/// Timeline items, optionally of one cost center. Items running on `today`
/// are highlighted.
pub async fn list(planer: &mut Planer, kst_nr: Option<&str>, today: NaiveDate) -> Result<()> {
    let items = planer.timeline(kst_nr).await?;

    if items.is_empty() {
        println!("{}", "No timeline items found".dimmed());
        return Ok(());
    }

    for item in sorted(&items) {
        let progress = item.progress.unwrap_or(0.0);
        let title = format!("{:<28}", item.title);
        let title = if item.is_active_on(today) {
            title.bold().to_string()
        } else {
            title
        };
        println!(
            "{} {} {} {} {:>3.0}% {}",
            format!("[{:>3}]", item.id).dimmed(),
            format!("{:<8}", item.cost_center_nr.as_deref().unwrap_or("-")).cyan(),
            title,
            progress_bar(progress, BAR_WIDTH),
            progress.clamp(0.0, 100.0),
            dates(item).dimmed()
        );
    }
    Ok(())
}

pub async fn add(planer: &mut Planer, req: NewTimelineItem) -> Result<()> {
    req.validate()?;
    let item = planer.create_timeline_item(&req).await?;
    println!("{} {} (Id {})", "Created".green(), item.title, item.id);
    Ok(())
}

pub async fn edit(planer: &mut Planer, id: u64, patch: TimelinePatch) -> Result<()> {
    patch.validate()?;
    planer.update_timeline_item(id, &patch).await?;
    println!("{} timeline item {}", "Updated".green(), id);
    Ok(())
}

pub async fn delete(planer: &mut Planer, id: u64) -> Result<()> {
    planer.delete_timeline_item(id).await?;
    println!("{} timeline item {}", "Deleted".red(), id);
    Ok(())
}
