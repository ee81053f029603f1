//! # System Instruction Synthesis
//!
//! Turns the catalog and persona into the natural-language prompt handed to
//! the live session. Synthesis is a pure function of its inputs; the caller
//! decides where the result is stored.
//!
//! The prompt text comes from an [`InstructionTemplate`] with four slots that
//! must appear exactly once, in this order:
//!
//! | slot                | value                                        |
//! |---------------------|----------------------------------------------|
//! | `{gender}`          | "Female" or "Male"                           |
//! | `{language}`        | spoken language, "English" when blank        |
//! | `{products}`        | product summary clause                       |
//! | `{product_details}` | numbered product records                     |

use thiserror::Error;

use crate::domain::{Persona, Product};

const NO_PRODUCTS_SUMMARY: &str = "products once they are added";
const NO_PRODUCTS_DETAILS: &str = "No products added yet.";

const DEFAULT_TEMPLATE: &str = "\
You are a {gender} TikTok Live Selling Affiliate speaking in {language}.

Your role is to actively promote and sell {products} to viewers who join your live stream. Upon receiving product's information, immediately engage your audience with a captivating pitch. Clearly highlight the key features and benefits of the product in an enthusiastic yet calm and authentic manner.

Encourage viewers to tap on the yellow basket icon to purchase immediately, emphasizing urgency by mentioning limited availability or high demand. Speak naturally in casual, engaging language typical of a real user-generated content (UGC) broadcaster, without using profanity or sounding scripted.

Your primary focus is strictly on promoting and selling the featured TikTok Shop products. Avoid any unrelated topics or distractions. Maintain clear, calm speech without heavy breathing, ensuring a comfortable and enjoyable experience for viewers.

Your response should come as you are talking to the audience. Never address the user who is sending you inputs and avoid saying \"how can I help you\", \"I will do that\", or any phrase that would reveal that you are a bot.

Product details:
{product_details}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Gender,
    Language,
    Products,
    ProductDetails,
}

impl Slot {
    const ALL: [Slot; 4] = [Slot::Gender, Slot::Language, Slot::Products, Slot::ProductDetails];

    fn placeholder(self) -> &'static str {
        match self {
            Slot::Gender => "{gender}",
            Slot::Language => "{language}",
            Slot::Products => "{products}",
            Slot::ProductDetails => "{product_details}",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is missing the {0} placeholder")]
    MissingSlot(&'static str),
    #[error("template repeats the {0} placeholder")]
    DuplicateSlot(&'static str),
    #[error("placeholder {found} must come after {expected_after}")]
    OutOfOrder {
        found: &'static str,
        expected_after: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// A parsed prompt template. Text outside the four placeholders is copied
/// verbatim, so braces inside product names never get interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTemplate {
    segments: Vec<Segment>,
}

impl Default for InstructionTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|_| unreachable!("built-in template is valid"))
    }
}

impl InstructionTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut seen: Vec<Slot> = Vec::new();

        while let Some((offset, slot)) = next_slot(rest) {
            if seen.contains(&slot) {
                return Err(TemplateError::DuplicateSlot(slot.placeholder()));
            }
            if let Some(&previous) = seen.last() {
                if slot_rank(slot) < slot_rank(previous) {
                    return Err(TemplateError::OutOfOrder {
                        found: slot.placeholder(),
                        expected_after: previous.placeholder(),
                    });
                }
            }
            if offset > 0 {
                segments.push(Segment::Text(rest[..offset].to_string()));
            }
            segments.push(Segment::Slot(slot));
            seen.push(slot);
            rest = &rest[offset + slot.placeholder().len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        if let Some(missing) = Slot::ALL.iter().find(|slot| !seen.contains(slot)) {
            return Err(TemplateError::MissingSlot(missing.placeholder()));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, products: &[Product], persona: &Persona) -> String {
        let summary = product_summary(products);
        let details = product_details(products);

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(Slot::Gender) => out.push_str(persona.gender.label()),
                Segment::Slot(Slot::Language) => out.push_str(persona.spoken_language()),
                Segment::Slot(Slot::Products) => out.push_str(&summary),
                Segment::Slot(Slot::ProductDetails) => out.push_str(&details),
            }
        }
        out
    }
}

fn slot_rank(slot: Slot) -> usize {
    Slot::ALL.iter().position(|s| *s == slot).unwrap_or(usize::MAX)
}

/// Earliest placeholder in `text` and its byte offset.
fn next_slot(text: &str) -> Option<(usize, Slot)> {
    Slot::ALL
        .iter()
        .filter_map(|slot| text.find(slot.placeholder()).map(|offset| (offset, *slot)))
        .min_by_key(|(offset, _)| *offset)
}

/// Clause naming what the agent sells.
pub fn product_summary(products: &[Product]) -> String {
    match products {
        [] => NO_PRODUCTS_SUMMARY.to_string(),
        [only] => only.name.clone(),
        many => many
            .iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Product records appended to the prompt, numbered when there are several.
pub fn product_details(products: &[Product]) -> String {
    match products {
        [] => NO_PRODUCTS_DETAILS.to_string(),
        [only] => format_record("Product", only),
        many => many
            .iter()
            .enumerate()
            .map(|(index, product)| format_record(&format!("Product {}", index + 1), product))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

fn format_record(label: &str, product: &Product) -> String {
    let mut record = format!(
        "{label}: {}\nDescription: {}",
        product.name, product.description
    );
    if let Some(price) = product.listed_price() {
        record.push_str("\nPrice: ");
        record.push_str(price);
    }
    record
}

/// Builds the system instruction with the built-in template.
#[cfg(test)]
pub fn build_system_instruction(products: &[Product], persona: &Persona) -> String {
    InstructionTemplate::default().render(products, persona)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoiceGender;

    fn widget() -> Product {
        Product::new("product-1", "Widget").with_description("Shiny").with_price("$9")
    }

    fn gadget() -> Product {
        Product::new("product-2", "Gadget").with_description("Handy")
    }

    #[test]
    fn empty_catalog_uses_placeholders() {
        let instruction = build_system_instruction(&[], &Persona::default());

        assert!(instruction.starts_with("You are a Female TikTok Live Selling Affiliate speaking in English."));
        assert!(instruction.contains("actively promote and sell products once they are added to viewers"));
        assert!(instruction.ends_with("Product details:\nNo products added yet."));
    }

    #[test]
    fn single_product_record_has_price_line() {
        assert_eq!(product_summary(&[widget()]), "Widget");
        assert_eq!(
            product_details(&[widget()]),
            "Product: Widget\nDescription: Shiny\nPrice: $9"
        );
    }

    #[test]
    fn missing_or_empty_price_omits_price_line() {
        let mut product = widget();
        product.price = None;
        assert_eq!(product_details(&[product.clone()]), "Product: Widget\nDescription: Shiny");

        product.price = Some(String::new());
        assert_eq!(product_details(&[product]), "Product: Widget\nDescription: Shiny");
    }

    #[test]
    fn several_products_are_numbered_in_catalog_order() {
        let products = [widget(), gadget()];

        assert_eq!(product_summary(&products), "Widget, Gadget");
        assert_eq!(
            product_details(&products),
            "Product 1: Widget\nDescription: Shiny\nPrice: $9\n\nProduct 2: Gadget\nDescription: Handy"
        );
    }

    #[test]
    fn persona_fills_gender_and_language() {
        let persona = Persona::new("Vietnamese", VoiceGender::Male);
        let instruction = build_system_instruction(&[gadget()], &persona);

        assert!(instruction.starts_with("You are a Male TikTok Live Selling Affiliate speaking in Vietnamese."));
        assert!(instruction.contains("sell Gadget to viewers"));
    }

    #[test]
    fn braces_in_product_text_are_not_interpolated() {
        let product = Product::new("product-1", "{language}").with_description("{gender}");
        let template = InstructionTemplate::parse("{gender}|{language}|{products}|{product_details}").unwrap();

        let rendered = template.render(&[product], &Persona::default());
        assert_eq!(rendered, "Female|English|{language}|Product: {language}\nDescription: {gender}");
    }

    #[test]
    fn template_requires_every_slot_once_in_order() {
        assert_eq!(
            InstructionTemplate::parse("{gender} {language} {products}"),
            Err(TemplateError::MissingSlot("{product_details}"))
        );
        assert_eq!(
            InstructionTemplate::parse("{gender} {gender} {language} {products} {product_details}"),
            Err(TemplateError::DuplicateSlot("{gender}"))
        );
        assert_eq!(
            InstructionTemplate::parse("{language} {gender} {products} {product_details}"),
            Err(TemplateError::OutOfOrder { found: "{gender}", expected_after: "{language}" })
        );
    }

    #[test]
    fn custom_template_keeps_surrounding_text() {
        let template = InstructionTemplate::parse(
            "Voice: {gender}. Language: {language}. Selling {products}.\n{product_details}\n-- end",
        )
        .unwrap();

        let rendered = template.render(&[widget(), gadget()], &Persona::new("Thai", VoiceGender::Female));
        assert!(rendered.starts_with("Voice: Female. Language: Thai. Selling Widget, Gadget.\nProduct 1: Widget"));
        assert!(rendered.ends_with("Description: Handy\n-- end"));
    }
}
