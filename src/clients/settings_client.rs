use tokio::sync::mpsc;
use tracing::warn;
use crate::domain::{DeclarationRow, LiveConnectConfig, Product, VoiceGender};
use crate::messages::SettingsRequest;
use crate::settings_actor::SettingsError;

/// Client for interacting with the settings actor.
#[derive(Clone)]
pub struct SettingsClient {
    sender: mpsc::UnboundedSender<SettingsRequest>,
}

impl SettingsClient {
    pub fn new(sender: mpsc::UnboundedSender<SettingsRequest>) -> Self {
        Self { sender }
    }

    /// Forwards a catalog snapshot. Safe to call from a synchronous listener.
    pub fn catalog_changed(&self, products: &[Product]) {
        let request = SettingsRequest::CatalogChanged { products: products.to_vec() };
        if self.sender.send(request).is_err() {
            warn!("Settings actor closed, catalog change dropped");
        }
    }

    pub fn shutdown(&self) -> Result<(), SettingsError> {
        self.sender
            .send(SettingsRequest::Shutdown)
            .map_err(|_| SettingsError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(SettingsClient => fn set_language(language: String) -> String as SettingsRequest::SetLanguage, Error = SettingsError);
client_method!(SettingsClient => fn set_gender(gender: VoiceGender) -> String as SettingsRequest::SetGender, Error = SettingsError);
client_method!(SettingsClient => fn update_function_description(name: String, description: String) -> bool as SettingsRequest::UpdateFunctionDescription, Error = SettingsError);
client_method!(SettingsClient => fn set_connected(connected: bool) -> () as SettingsRequest::SetConnected, Error = SettingsError);
client_method!(SettingsClient => fn get_config() -> LiveConnectConfig as SettingsRequest::GetConfig, Error = SettingsError);
client_method!(SettingsClient => fn system_instruction() -> String as SettingsRequest::GetSystemInstruction, Error = SettingsError);
client_method!(SettingsClient => fn function_declarations() -> Vec<DeclarationRow> as SettingsRequest::ListFunctionDeclarations, Error = SettingsError);
