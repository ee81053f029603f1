/// Maximum number of products a catalog can hold.
pub const MAX_PRODUCTS: usize = 100;
/// Maximum length of a product name, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of a product description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Represents one sellable item in the operator's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

/// Payload for creating a new product. The default payload is the blank
/// product appended by the "add" button.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

/// Payload for editing individual fields of an existing product.
///
/// `price` and `image_url` are doubly optional: `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl Product {
    /// Creates a product with the given id and name and an empty description.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: None,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Name shown in the product list.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed Product"
        } else {
            &self.name
        }
    }

    /// Heading shown above the edit form.
    pub fn form_title(&self) -> String {
        if self.name.is_empty() {
            "New Product".to_string()
        } else {
            format!("Edit: {}", self.name)
        }
    }

    /// Price text, if one was entered.
    pub fn listed_price(&self) -> Option<&str> {
        self.price.as_deref().filter(|price| !price.is_empty())
    }

    /// Clips name and description to their maximum lengths.
    pub(crate) fn clamp_fields(&mut self) {
        truncate_chars(&mut self.name, NAME_MAX_CHARS);
        truncate_chars(&mut self.description, DESCRIPTION_MAX_CHARS);
    }
}

/// Counter label shown above the product list, e.g. "Products (3/100)".
pub fn catalog_label(len: usize) -> String {
    format!("Products ({}/{})", len, MAX_PRODUCTS)
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}
