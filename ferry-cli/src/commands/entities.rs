//! Entity listing command

use anyhow::Result;
use colored::*;
use ferry_core::domain::entity::{EntityItem, EntityType, selection_set};
use ferry_core::dto::entity::FetchEntitiesRequest;

use crate::config::Settings;

/// List the candidates of one entity type, marking those already selected
pub async fn list_entities(settings: &Settings, entity_type: EntityType, json: bool) -> Result<()> {
    let form = settings.load_form()?;
    if form.magento.base_url.trim().is_empty() {
        anyhow::bail!("Please enter Magento Base URL first");
    }

    let request = FetchEntitiesRequest {
        entity_type,
        magento_config: form.magento.clone(),
    };
    let items = settings
        .client()
        .fetch_entities(&request)
        .await?
        .into_result()
        .map_err(|e| anyhow::anyhow!(e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return Ok(());
    }

    let selected = selection_set(form.ids(entity_type));
    println!(
        "{}",
        format!("Found {} {}:", items.len(), entity_type).bold()
    );
    println!();
    for item in &items {
        print_item(item, selected.contains(&item.id.key()));
    }

    Ok(())
}

fn print_item(item: &EntityItem, checked: bool) {
    let mark = if checked { "[x]".green() } else { "[ ]".dimmed() };
    println!("  {} {:>8}  {}", mark, item.id.key().cyan(), item.label);
}
