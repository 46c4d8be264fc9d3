use crate::output::{print_json, print_table};
use anyhow::Result;
use shipby_core::config::Config;
use shipby_server::{BatchRunner, OrderStatus, RunSummary, RunnerSettings};
use std::sync::Arc;

use super::{build_client, ensure_valid};

pub fn run(config: &Config, dry_run: bool, json: bool) -> Result<()> {
    ensure_valid(config)?;
    let client = build_client(config)?;
    let mut settings = RunnerSettings::from_config(config)?;
    settings.dry_run = dry_run;
    let runner = BatchRunner::new(Arc::new(client), settings);

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(runner.run())?;

    if json {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Window: created since {}, updated since {}",
        summary.window.created_since_param(),
        summary.window.updated_since_param()
    );
    println!(
        "Listed {} sale(s), {} candidate(s){}",
        summary.listed,
        summary.candidates,
        if summary.dry_run { " [dry run]" } else { "" }
    );
    if summary.outcomes.is_empty() {
        return;
    }
    println!();

    let rows = summary
        .outcomes
        .iter()
        .map(|o| {
            let (status, ship_by, detail) = match &o.status {
                OrderStatus::Updated { ship_by, staged } => (
                    "updated",
                    ship_by.format("%Y-%m-%d").to_string(),
                    staged.map(|r| r.to_string()).unwrap_or_default(),
                ),
                OrderStatus::Planned {
                    ship_by, staged, ..
                } => (
                    "planned",
                    ship_by.format("%Y-%m-%d").to_string(),
                    staged.map(|r| r.to_string()).unwrap_or_default(),
                ),
                OrderStatus::Unchanged => ("unchanged", String::new(), String::new()),
                OrderStatus::Failed { stage, error } => {
                    ("failed", String::new(), format!("{stage:?}: {error}"))
                }
            };
            vec![o.sale_id.clone(), status.to_string(), ship_by, detail]
        })
        .collect();
    print_table(&["SALE", "STATUS", "SHIP BY", "DETAIL"], rows);

    println!();
    println!(
        "{} updated, {} unchanged, {} failed in {} ms",
        summary.updated, summary.unchanged, summary.failed, summary.duration_ms
    );
}
