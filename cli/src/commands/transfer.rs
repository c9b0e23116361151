use anyhow::{Context, Result};
use std::path::Path;

use super::Service;

pub(crate) fn cmd_export(svc: &Service, output: Option<&Path>, json: bool) -> Result<()> {
    let data = svc.export_json()?;

    match output {
        None => println!("{data}"),
        Some(path) => {
            std::fs::write(path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let count = svc.collection().len();
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "exported": count, "path": path.display().to_string() })
                );
            } else {
                println!("Exported {count} ingredient(s) to {}", path.display());
            }
        }
    }

    Ok(())
}

pub(crate) fn cmd_import(svc: &mut Service, file: &Path, json: bool) -> Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = svc.import_json(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Imported {} new ingredient(s), merged {} into existing ones",
            summary.inserted, summary.merged
        );
    }

    Ok(())
}
