//! Configuration handed to the live conversational session.
//!
//! The shape is owned by the session provider, so every struct keeps the
//! fields it does not understand in a flattened `extra` map and writes them
//! back untouched. Only `system_instruction` and declaration descriptions are
//! ever modified here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveConnectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tool group. Only groups carrying function declarations are editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_declarations: Option<Vec<FunctionDeclaration>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the function declaration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRow {
    pub name: String,
    pub arguments: Vec<String>,
    pub description: String,
}

impl Tool {
    pub fn with_functions(declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            function_declarations: Some(declarations),
            extra: Map::new(),
        }
    }
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            parameters: None,
            extra: Map::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Keys of the parameter schema's `properties` object.
    pub fn argument_names(&self) -> Vec<String> {
        self.parameters
            .as_ref()
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_object)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl LiveConnectConfig {
    /// All function declarations across every tool group, in order.
    pub fn function_declarations(&self) -> impl Iterator<Item = &FunctionDeclaration> {
        self.tools
            .iter()
            .filter_map(|tool| tool.function_declarations.as_ref())
            .flatten()
    }

    pub fn declaration_rows(&self) -> Vec<DeclarationRow> {
        self.function_declarations()
            .map(|declaration| DeclarationRow {
                name: declaration.name.clone(),
                arguments: declaration.argument_names(),
                description: declaration.description.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Replaces the description of the declaration called `name`.
    ///
    /// Returns `false` and leaves the config untouched when no declaration
    /// has that name.
    pub fn update_function_description(&mut self, name: &str, description: &str) -> bool {
        let mut updated = false;
        let declarations = self
            .tools
            .iter_mut()
            .filter_map(|tool| tool.function_declarations.as_mut())
            .flatten();
        for declaration in declarations {
            if declaration.name == name {
                declaration.description = Some(description.to_string());
                updated = true;
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> LiveConnectConfig {
        serde_json::from_value(json!({
            "responseModalities": ["AUDIO"],
            "tools": [
                { "googleSearch": {} },
                {
                    "functionDeclarations": [
                        {
                            "name": "show_product",
                            "description": "Shows a product card",
                            "parameters": {
                                "type": "OBJECT",
                                "properties": { "product_id": { "type": "STRING" } }
                            }
                        },
                        { "name": "tool_x", "description": "old text" }
                    ]
                }
            ]
        }))
        .expect("valid config")
    }

    #[test]
    fn update_description_touches_only_the_named_declaration() {
        let original = sample_config();
        let mut config = original.clone();

        assert!(config.update_function_description("tool_x", "new text"));

        let tool_x = config
            .function_declarations()
            .find(|fd| fd.name == "tool_x")
            .expect("tool_x present");
        assert_eq!(tool_x.description.as_deref(), Some("new text"));

        let show_product = config
            .function_declarations()
            .find(|fd| fd.name == "show_product")
            .expect("show_product present");
        let original_show_product = original
            .function_declarations()
            .find(|fd| fd.name == "show_product")
            .expect("show_product present");
        assert_eq!(show_product, original_show_product);
        assert_eq!(config.tools[0], original.tools[0]);
        assert_eq!(config.extra, original.extra);
    }

    #[test]
    fn unknown_declaration_leaves_config_unchanged() {
        let original = sample_config();
        let mut config = original.clone();

        assert!(!config.update_function_description("missing", "anything"));
        assert_eq!(config, original);
    }

    #[test]
    fn rows_list_argument_names() {
        let rows = sample_config().declaration_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "show_product");
        assert_eq!(rows[0].arguments, vec!["product_id".to_string()]);
        assert!(rows[1].arguments.is_empty());
        assert_eq!(rows[1].description, "old text");
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let mut config = sample_config();
        config.system_instruction = Some("be nice".into());

        let value = serde_json::to_value(&config).expect("serializable");
        assert_eq!(value["systemInstruction"], "be nice");
        assert_eq!(value["responseModalities"], json!(["AUDIO"]));
        assert_eq!(value["tools"][0], json!({ "googleSearch": {} }));
    }
}
