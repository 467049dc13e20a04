use anyhow::Result;
use owo_colors::OwoColorize;

use crate::data::Planer;
use crate::utils::tui::create_spinner;

pub async fn run(planer: &mut Planer) -> Result<()> {
    let spinner = create_spinner("Checking server");
    let result = planer.health().await;
    spinner.finish_and_clear();

    let health = result?;
    if health.status == "ok" {
        println!("{} Server reachable, token ok", "✓".green());
        println!("   {}", "Lists:".dimmed());
        for list in &health.lists_available {
            println!("   {}", list);
        }
        return Ok(());
    }

    println!("{} Server reachable, SharePoint not", "✗".red());
    if let Some(error) = &health.error {
        println!("   {}", error.red());
    }
    anyhow::bail!("Health check failed")
}
