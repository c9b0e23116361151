use anyhow::Result;

use larder_core::models::{BoughtFilter, IngredientFilter};

use super::Service;
use super::helpers::print_ingredient_table;

pub(crate) fn cmd_list(
    svc: &Service,
    search: Option<String>,
    bought: BoughtFilter,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let filter = IngredientFilter {
        search,
        bought,
        category,
    };
    let rows = svc.list(&filter);

    if json {
        let items: Vec<_> = rows
            .iter()
            .map(|(i, r)| serde_json::json!({ "position": i + 1, "ingredient": r }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if rows.is_empty() {
        if svc.collection().is_empty() {
            eprintln!("No ingredients yet. Use `larder add` to add one.");
        } else {
            eprintln!("No ingredients found.");
        }
    } else {
        print_ingredient_table(&rows);
        let bought = rows.iter().filter(|(_, r)| r.bought).count();
        println!("{} shown, {bought} bought", rows.len());
    }

    Ok(())
}

pub(crate) fn cmd_categories(svc: &Service, json: bool) -> Result<()> {
    let categories = svc.categories();

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else if categories.is_empty() {
        eprintln!("No categories yet.");
    } else {
        for category in categories {
            println!("{category}");
        }
    }

    Ok(())
}
