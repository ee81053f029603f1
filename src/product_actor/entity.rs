use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the product
    /// * `payload` - Initial field values; the default payload is a blank product
    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        let mut product = Self {
            id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            image_url: payload.image_url,
        };
        product.clamp_fields();
        Ok(product)
    }

    /// Updates individual fields of the product.
    ///
    /// # Fields Updated
    /// - `name`: clipped to 100 characters
    /// - `description`: clipped to 1000 characters
    /// - `price`, `image_url`: set or cleared
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.clamp_fields();
        Ok(())
    }

    /// Replaces every field except the id.
    fn on_replace(&mut self, next: Product) -> Result<(), String> {
        let Product { id: _, name, description, price, image_url } = next;
        self.name = name;
        self.description = description;
        self.price = price;
        self.image_url = image_url;
        self.clamp_fields();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};

    #[test]
    fn blank_create_has_empty_fields() {
        let product = Product::from_create("product-1".into(), ProductCreate::default()).unwrap();

        assert_eq!(product.id, "product-1");
        assert!(product.name.is_empty());
        assert!(product.description.is_empty());
        assert_eq!(product.price, None);
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn patch_sets_and_clears_optional_fields() {
        let mut product = Product::new("product-1", "Widget").with_price("$9");

        product.on_update(ProductPatch {
            description: Some("Shiny".into()),
            price: Some(None),
            image_url: Some(Some("https://example.com/w.jpg".into())),
            ..Default::default()
        }).unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.description, "Shiny");
        assert_eq!(product.price, None);
        assert_eq!(product.image_url.as_deref(), Some("https://example.com/w.jpg"));
    }

    #[test]
    fn replace_keeps_id_and_clips_text() {
        let mut product = Product::new("product-1", "Widget");
        let next = Product::new("product-9", "n".repeat(NAME_MAX_CHARS + 5))
            .with_description("d".repeat(DESCRIPTION_MAX_CHARS + 5));

        product.on_replace(next).unwrap();

        assert_eq!(product.id, "product-1");
        assert_eq!(product.name.len(), NAME_MAX_CHARS);
        assert_eq!(product.description.len(), DESCRIPTION_MAX_CHARS);
    }
}
