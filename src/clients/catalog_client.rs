use tracing::{debug, info, instrument, warn};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::product_actor::CatalogError;
use crate::actor_framework::ResourceClient;

/// Client for interacting with the product catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(CatalogClient, Product, CatalogError, product);

impl CatalogClient {
    /// Appends a blank product and selects it.
    ///
    /// # Errors
    /// `CatalogError::CapacityExceeded` once the catalog holds 100 products.
    #[instrument(skip(self))]
    pub async fn add_product(&self) -> Result<String, CatalogError> {
        self.create_product(ProductCreate::default()).await
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<String, CatalogError> {
        debug!("Sending request");
        match self.inner.create(payload).await {
            Ok(id) => {
                info!(product_id = %id, "Product added");
                Ok(id)
            }
            Err(e) => {
                let error = CatalogError::from(e);
                warn!(error = %error, "Product not added");
                Err(error)
            }
        }
    }

    /// Replaces the stored record with the same id. Returns `false` when no
    /// product has that id.
    #[instrument(skip(self), fields(product_id = %product.id))]
    pub async fn update_product(&self, product: Product) -> Result<bool, CatalogError> {
        debug!("Sending request");
        let replaced = self.inner.replace(product).await?;
        Ok(replaced.is_some())
    }

    #[instrument(skip(self))]
    pub async fn edit_product(&self, id: String, patch: ProductPatch) -> Result<Option<Product>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn select_product(&self, id: String) -> Result<bool, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.select(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn select_next(&self) -> Result<Option<String>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.select_next().await?)
    }

    #[instrument(skip(self))]
    pub async fn select_previous(&self) -> Result<Option<String>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.select_previous().await?)
    }

    #[instrument(skip(self))]
    pub async fn selected_product(&self) -> Result<Option<Product>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.selected().await?)
    }

    #[instrument(skip(self))]
    pub async fn set_read_only(&self, read_only: bool) -> Result<(), CatalogError> {
        debug!("Sending request");
        Ok(self.inner.set_read_only(read_only).await?)
    }
}
