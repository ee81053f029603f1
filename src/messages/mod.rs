use tokio::sync::oneshot;
use crate::domain::{DeclarationRow, LiveConnectConfig, Product, VoiceGender};
use crate::settings_actor::SettingsError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the settings actor. Each variant includes parameters
/// and a oneshot channel for responses.
#[derive(Debug)]
pub enum SettingsRequest {
    /// Sent by the catalog after every committed mutation. No reply.
    CatalogChanged {
        products: Vec<Product>,
    },
    SetLanguage {
        language: String,
        respond_to: ServiceResponse<String, SettingsError>,
    },
    SetGender {
        gender: VoiceGender,
        respond_to: ServiceResponse<String, SettingsError>,
    },
    UpdateFunctionDescription {
        name: String,
        description: String,
        respond_to: ServiceResponse<bool, SettingsError>,
    },
    SetConnected {
        connected: bool,
        respond_to: ServiceResponse<(), SettingsError>,
    },
    GetConfig {
        respond_to: ServiceResponse<LiveConnectConfig, SettingsError>,
    },
    GetSystemInstruction {
        respond_to: ServiceResponse<String, SettingsError>,
    },
    ListFunctionDeclarations {
        respond_to: ServiceResponse<Vec<DeclarationRow>, SettingsError>,
    },
    Shutdown,
}
