use anyhow::Result;

use larder_core::models::IngredientRecord;

use super::Service;
use super::helpers::{json_error, prompt_confirm, to_index};

fn print_bought(position: usize, record: &IngredientRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        let state = if record.bought { "bought" } else { "not bought" };
        println!("#{position} {} marked {state}", record.name);
    }
    Ok(())
}

pub(crate) fn cmd_bought(svc: &mut Service, position: usize, undo: bool, json: bool) -> Result<()> {
    let record = svc.set_bought(to_index(position)?, !undo)?;
    print_bought(position, &record, json)
}

pub(crate) fn cmd_toggle(svc: &mut Service, position: usize, json: bool) -> Result<()> {
    let record = svc.toggle_bought(to_index(position)?)?;
    print_bought(position, &record, json)
}

pub(crate) fn cmd_delete(svc: &mut Service, position: usize, yes: bool, json: bool) -> Result<()> {
    let index = to_index(position)?;
    if !yes {
        let Some(record) = svc.collection().get(index) else {
            anyhow::bail!("No ingredient at position {position}");
        };
        if !prompt_confirm(&format!("Delete \"{}\"?", record.name))? {
            if json {
                println!("{}", json_error("Cancelled"));
            } else {
                eprintln!("Cancelled");
            }
            return Ok(());
        }
    }

    let removed = svc.delete(index)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": removed }));
    } else {
        println!("Deleted {} ({})", removed.name, removed.category);
    }

    Ok(())
}

pub(crate) fn cmd_clear(svc: &mut Service, yes: bool, json: bool) -> Result<()> {
    if !yes && !prompt_confirm("Delete ALL ingredients?")? {
        if json {
            println!("{}", json_error("Cancelled"));
        } else {
            eprintln!("Cancelled");
        }
        return Ok(());
    }

    let count = svc.clear_all()?;

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        println!("Deleted {count} ingredient(s)");
    }

    Ok(())
}
