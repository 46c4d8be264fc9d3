use crate::output::print_json;
use anyhow::{anyhow, Result};
use dear_client::types::parse_dear_datetime;
use serde::Serialize;
use shipby_core::{reconcile, Decision, OrderSnapshot};

#[derive(Serialize)]
struct ReconcileReport<'a> {
    delivery_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(flatten)]
    decision: &'a Decision,
}

pub fn run(ship_by: Option<&str>, note: Option<String>, json: bool) -> Result<()> {
    let ship_by = ship_by
        .map(|raw| parse_dear_datetime(raw).ok_or_else(|| anyhow!("unrecognised --ship-by '{raw}'")))
        .transpose()?;

    let snapshot = OrderSnapshot::new(note, ship_by);
    let decision = reconcile(&snapshot)?;

    if json {
        return print_json(&ReconcileReport {
            delivery_date: snapshot.delivery_date,
            decision: &decision,
        });
    }

    match &snapshot.delivery_date {
        Some(d) => println!("Delivery date: {}", d.format("%Y-%m-%d")),
        None => println!("Delivery date: (none)"),
    }
    match decision {
        Decision::NoOp => println!("No change: ship-by already matches the delivery date."),
        Decision::Update {
            ship_by,
            note,
            staged,
        } => {
            println!("New ship-by: {}", ship_by.format("%Y-%m-%d"));
            if let Some(reason) = staged {
                println!("Staged: {reason}");
            }
            println!("Note:");
            for line in note.lines() {
                println!("  {line}");
            }
        }
    }
    Ok(())
}
