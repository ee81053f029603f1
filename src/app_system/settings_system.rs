use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::app_system::AppConfig;
use crate::clients::{CatalogClient, SettingsClient};
use crate::domain::{LiveConnectConfig, Persona, Product, MAX_PRODUCTS};
use crate::instruction::InstructionTemplate;
use crate::product_actor::CatalogError;
use crate::settings_actor::{SettingsError, SettingsService};

/// The settings panel as a running system: the catalog actor feeding the
/// settings actor through a change listener.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct SettingsSystem {
    pub catalog_client: CatalogClient,
    pub settings_client: SettingsClient,
    catalog_handle: JoinHandle<()>,
    settings_handle: JoinHandle<()>,
}

impl SettingsSystem {
    /// Starts both actors. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Fails when `initial_products` exceeds the catalog capacity or repeats an id.
    pub fn start(
        config: &AppConfig,
        live_config: LiveConnectConfig,
        template: InstructionTemplate,
        initial_products: Vec<Product>,
    ) -> Result<Self, SettingsError> {
        info!(products = initial_products.len(), "Starting settings system");
        let initial_products: Vec<Product> = initial_products
            .into_iter()
            .map(|mut product| {
                product.clamp_fields();
                product
            })
            .collect();

        // 1. Catalog actor, seeded and validated before anything is spawned
        let product_id_counter = Arc::new(AtomicU64::new(1));
        let next_product_id = move || {
            let id = product_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("product-{}", id)
        };
        let (catalog_actor, resource_client) =
            ResourceActor::<Product>::new(config.channel_buffer, MAX_PRODUCTS, next_product_id);
        let catalog_actor = catalog_actor
            .with_items(initial_products.clone())
            .map_err(CatalogError::from)?;

        // 2. Settings actor, starting from the seeded catalog
        let persona = Persona::new(config.language.clone(), config.voice);
        let (settings_service, settings_client) =
            SettingsService::new(live_config, persona, template, initial_products);

        // 3. Every catalog mutation re-synthesizes the system instruction
        let listener = settings_client.clone();
        let catalog_actor = catalog_actor.on_change(move |products| listener.catalog_changed(products));

        let settings_handle = tokio::spawn(settings_service.run());
        let catalog_handle = tokio::spawn(catalog_actor.run());

        Ok(Self {
            catalog_client: CatalogClient::new(resource_client),
            settings_client,
            catalog_handle,
            settings_handle,
        })
    }

    /// Locks or unlocks every setting while the live session is connected.
    pub async fn set_connected(&self, connected: bool) -> Result<(), SettingsError> {
        self.catalog_client.set_read_only(connected).await?;
        self.settings_client.set_connected(connected).await
    }

    /// Stops both actors. Clones of `catalog_client` held elsewhere keep the
    /// catalog actor alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), SettingsError> {
        info!("Shutting down settings system...");

        // The catalog actor stops once its mailbox closes, releasing its
        // listener's handle to the settings actor.
        drop(self.catalog_client);
        join(self.catalog_handle).await?;

        self.settings_client.shutdown()?;
        join(self.settings_handle).await?;

        info!("Settings system shutdown complete.");
        Ok(())
    }
}

async fn join(handle: JoinHandle<()>) -> Result<(), SettingsError> {
    handle.await.map_err(|e| {
        error!("Actor task failed: {:?}", e);
        SettingsError::ActorCommunicationError(format!("Actor task failed: {}", e))
    })
}
