use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::clients::SettingsClient;
use crate::domain::{LiveConnectConfig, Persona, Product, VoiceGender};
use crate::instruction::InstructionTemplate;
use crate::messages::{ServiceResponse, SettingsRequest};
use super::SettingsError;

/// Root actor owning the live session configuration.
///
/// It keeps the latest catalog snapshot and persona, and rewrites
/// `system_instruction` wholesale whenever either changes.
pub struct SettingsService {
    receiver: mpsc::UnboundedReceiver<SettingsRequest>,
    products: Vec<Product>,
    persona: Persona,
    template: InstructionTemplate,
    config: LiveConnectConfig,
    connected: bool,
}

impl SettingsService {
    pub fn new(
        config: LiveConnectConfig,
        persona: Persona,
        template: InstructionTemplate,
        products: Vec<Product>,
    ) -> (Self, SettingsClient) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut service = Self {
            receiver,
            products,
            persona,
            template,
            config,
            connected: false,
        };
        service.refresh_instruction();
        (service, SettingsClient::new(sender))
    }

    #[instrument(name = "settings_service", skip(self))]
    pub async fn run(mut self) {
        info!("SettingsService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SettingsRequest::CatalogChanged { products } => {
                    self.handle_catalog_changed(products);
                }
                SettingsRequest::SetLanguage { language, respond_to } => {
                    self.handle_set_language(language, respond_to);
                }
                SettingsRequest::SetGender { gender, respond_to } => {
                    self.handle_set_gender(gender, respond_to);
                }
                SettingsRequest::UpdateFunctionDescription { name, description, respond_to } => {
                    self.handle_update_function_description(name, description, respond_to);
                }
                SettingsRequest::SetConnected { connected, respond_to } => {
                    info!(connected, "Session connection state changed");
                    self.connected = connected;
                    let _ = respond_to.send(Ok(()));
                }
                SettingsRequest::GetConfig { respond_to } => {
                    let _ = respond_to.send(Ok(self.config.clone()));
                }
                SettingsRequest::GetSystemInstruction { respond_to } => {
                    let instruction = self.config.system_instruction.clone().unwrap_or_default();
                    let _ = respond_to.send(Ok(instruction));
                }
                SettingsRequest::ListFunctionDeclarations { respond_to } => {
                    let _ = respond_to.send(Ok(self.config.declaration_rows()));
                }
                SettingsRequest::Shutdown => {
                    info!("SettingsService shutting down");
                    break;
                }
            }
        }
        info!("SettingsService stopped");
    }

    #[instrument(fields(products = products.len()), skip(self, products))]
    fn handle_catalog_changed(&mut self, products: Vec<Product>) {
        debug!("Processing catalog change");
        self.products = products;
        self.refresh_instruction();
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_language(&mut self, language: String, respond_to: ServiceResponse<String, SettingsError>) {
        if self.connected {
            warn!("Language edit rejected, session connected");
            let _ = respond_to.send(Err(SettingsError::Locked));
            return;
        }
        self.persona.language = language;
        let _ = respond_to.send(Ok(self.refresh_instruction()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_gender(&mut self, gender: VoiceGender, respond_to: ServiceResponse<String, SettingsError>) {
        if self.connected {
            warn!("Gender edit rejected, session connected");
            let _ = respond_to.send(Err(SettingsError::Locked));
            return;
        }
        self.persona.gender = gender;
        let _ = respond_to.send(Ok(self.refresh_instruction()));
    }

    #[instrument(skip(self, description, respond_to))]
    fn handle_update_function_description(
        &mut self,
        name: String,
        description: String,
        respond_to: ServiceResponse<bool, SettingsError>,
    ) {
        if self.connected {
            warn!("Description edit rejected, session connected");
            let _ = respond_to.send(Err(SettingsError::Locked));
            return;
        }
        let updated = self.config.update_function_description(&name, &description);
        if updated {
            info!("Function description updated");
        } else {
            debug!("No function declaration with that name");
        }
        let _ = respond_to.send(Ok(updated));
    }

    fn refresh_instruction(&mut self) -> String {
        let instruction = self.template.render(&self.products, &self.persona);
        debug!(
            products = self.products.len(),
            language = %self.persona.spoken_language(),
            gender = self.persona.gender.label(),
            "System instruction rebuilt"
        );
        self.config.system_instruction = Some(instruction.clone());
        instruction
    }
}
