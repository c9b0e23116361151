use anyhow::Result;
use std::path::Path;

use larder_core::models::NewIngredient;
use larder_core::reconcile::{QuantityMerge, Reconciliation};

use super::Service;
use super::helpers::parse_expiration;
use crate::image::load_image_data_url;

pub(crate) struct AddArgs<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub category: &'a str,
    pub expires: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub image: Option<&'a Path>,
}

pub(crate) fn cmd_add(svc: &mut Service, args: &AddArgs<'_>, json: bool) -> Result<()> {
    let mut candidate =
        NewIngredient::new(args.name.trim(), args.category.trim(), args.quantity.trim())
            .with_expiration(parse_expiration(args.expires)?)
            .with_notes(args.notes.unwrap_or_default().trim());
    if let Some(path) = args.image {
        candidate = candidate.with_image(load_image_data_url(path)?);
    }

    let outcome = svc.add(candidate)?;
    let position = outcome.position();
    let record = &svc.collection().records()[position];

    if json {
        let action = match outcome {
            Reconciliation::Inserted { .. } => "inserted",
            Reconciliation::Merged { .. } => "merged",
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "action": action,
                "position": position + 1,
                "ingredient": record,
            }))?
        );
    } else {
        let name = &record.name;
        let category = &record.category;
        let quantity = &record.quantity;
        match outcome {
            Reconciliation::Inserted { .. } => {
                println!("Added #{}: {name} ({category}) — {quantity}", position + 1);
            }
            Reconciliation::Merged { quantity: how, .. } => {
                println!("Merged into #{}: {name} ({category}) — {quantity}", position + 1);
                if how == QuantityMerge::Concatenated {
                    eprintln!("Note: quantities could not both be read as numbers; kept both");
                }
            }
        }
    }

    Ok(())
}
