mod domain;
mod clients;
mod messages;
mod instruction;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod product_actor;
mod settings_actor;

use serde_json::json;
use tracing::{error, info, Instrument};
use crate::app_system::{load_config, setup_tracing, SettingsSystem};
use crate::domain::{FunctionDeclaration, LiveConnectConfig, Product, ProductPatch, Tool, VoiceGender};

/// Session config as the live connection would hand it over: one tool group
/// the operator can annotate.
fn demo_live_config() -> LiveConnectConfig {
    let declarations = vec![
        FunctionDeclaration::new("show_product", "Displays a product card to viewers").with_parameters(json!({
            "type": "OBJECT",
            "properties": { "product_id": { "type": "STRING" } },
            "required": ["product_id"]
        })),
        FunctionDeclaration::new("pin_comment", "Pins a viewer comment").with_parameters(json!({
            "type": "OBJECT",
            "properties": { "comment_id": { "type": "STRING" }, "duration": { "type": "NUMBER" } }
        })),
    ];
    let mut config = LiveConnectConfig {
        tools: vec![Tool::with_functions(declarations)],
        ..LiveConnectConfig::default()
    };
    config.extra.insert("responseModalities".into(), json!(["AUDIO"]));
    config
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = load_config().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!("Starting live settings panel");

    let template = config.load_template().map_err(|e| e.to_string())?;
    let seed = vec![
        Product::new("featured-1", "Glow Serum")
            .with_description("Vitamin C serum for a brighter complexion")
            .with_price("$24.99"),
    ];
    let system = SettingsSystem::start(&config, demo_live_config(), template, seed)
        .map_err(|e| e.to_string())?;

    // Operator adds a second product and fills the form field by field
    let span = tracing::info_span!("product_editing");
    let product_id = async {
        let id = system.catalog_client.add_product().await?;
        system.catalog_client
            .edit_product(id.clone(), ProductPatch {
                name: Some("Silk Pillowcase".into()),
                description: Some("Mulberry silk, gentle on hair and skin".into()),
                price: Some(Some("$39".into())),
                ..Default::default()
            })
            .await?;
        Ok::<_, crate::product_actor::CatalogError>(id)
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    info!(product_id = %product_id, "Product configured");

    let span = tracing::info_span!("persona_editing");
    async {
        system.settings_client.set_language("English".into()).await?;
        system.settings_client.set_gender(VoiceGender::from_is_female(true)).await?;
        system.settings_client
            .update_function_description("show_product".into(), "Shows the product being pitched".into())
            .await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    for row in system.settings_client.function_declarations().await.map_err(|e| e.to_string())? {
        info!(name = %row.name, arguments = ?row.arguments, description = %row.description, "Function declaration");
    }

    let products = system.catalog_client.list_products().await.map_err(|e| e.to_string())?;
    info!(label = %crate::domain::catalog_label(products.len()), "Catalog ready");
    for product in &products {
        info!(id = %product.id, name = product.display_name(), title = %product.form_title(), "Product");
    }
    if let Some(selected) = system.catalog_client.selected_product().await.map_err(|e| e.to_string())? {
        info!(product_id = %selected.id, "Selected product");
    }

    // Operator saves the whole form, browses the list, then drops a scratch entry
    let span = tracing::info_span!("catalog_browsing");
    async {
        if let Some(mut featured) = system.catalog_client.get_product("featured-1".into()).await? {
            featured.price = Some("$21.99".into());
            let saved = system.catalog_client.update_product(featured).await?;
            info!(saved, "Featured product saved");
        }

        system.catalog_client.select_product(product_id.clone()).await?;
        let next = system.catalog_client.select_next().await?;
        let previous = system.catalog_client.select_previous().await?;
        info!(next = ?next, previous = ?previous, "Browsed catalog");

        let scratch = system.catalog_client.add_product().await?;
        let removed = system.catalog_client.remove_product(scratch).await?;
        info!(removed, "Scratch product removed");
        Ok::<_, crate::product_actor::CatalogError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let instruction = system.settings_client.system_instruction().await.map_err(|e| e.to_string())?;
    info!(chars = instruction.chars().count(), "System instruction rebuilt");

    // Settings are frozen for the duration of the live session
    system.set_connected(true).await.map_err(|e| e.to_string())?;
    if let Err(e) = system.catalog_client.add_product().await {
        error!(error = %e, "Product could not be added");
    }

    let live = system.settings_client.get_config().await.map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&live).map_err(|e| e.to_string())?;
    info!("Live session config:\n{}", rendered);

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
