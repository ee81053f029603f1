use serde::{Deserialize, Serialize};

/// Language used when the operator leaves the language field blank.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Voice the agent speaks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

impl VoiceGender {
    /// Maps the "female" toggle of the settings dialog.
    pub fn from_is_female(is_female: bool) -> Self {
        if is_female {
            Self::Female
        } else {
            Self::Male
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

/// Who the agent pretends to be: spoken language and voice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Persona {
    pub language: String,
    pub gender: VoiceGender,
}

impl Persona {
    pub fn new(language: impl Into<String>, gender: VoiceGender) -> Self {
        Self {
            language: language.into(),
            gender,
        }
    }

    /// The configured language, or English when none was entered.
    pub fn spoken_language(&self) -> &str {
        if self.language.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_language_defaults_to_english() {
        assert_eq!(Persona::default().spoken_language(), "English");
        assert_eq!(Persona::new("   ", VoiceGender::Male).spoken_language(), "English");
        assert_eq!(Persona::new("Thai", VoiceGender::Male).spoken_language(), "Thai");
    }

    #[test]
    fn entered_language_is_kept_verbatim() {
        let persona = Persona::new(" Thai ", VoiceGender::Female);
        assert_eq!(persona.spoken_language(), " Thai ");
    }

    #[test]
    fn toggle_maps_to_gender() {
        assert_eq!(VoiceGender::from_is_female(true).label(), "Female");
        assert_eq!(VoiceGender::from_is_female(false).label(), "Male");
    }
}
