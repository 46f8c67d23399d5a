//! Cover letter tones and the guidance text each one contributes to the prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Enthusiastic,
    Casual,
    Formal,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Enthusiastic,
        Tone::Casual,
        Tone::Formal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
        }
    }

    /// Exact, case-sensitive match against the supported tone names.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid tone '{value}'. Supported tones: {}",
                    supported_tones().join(", ")
                ))
            })
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            Tone::Professional => "professional, polished, and business-appropriate",
            Tone::Enthusiastic => {
                "energetic, passionate, and showing genuine excitement for the role"
            }
            Tone::Casual => "friendly, conversational, yet still respectful and appropriate",
            Tone::Formal => {
                "highly formal, traditional business letter style with proper etiquette"
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn supported_tones() -> Vec<&'static str> {
    Tone::ALL.iter().map(Tone::as_str).collect()
}

/// Guidance for a raw tone string; unknown values get the professional text.
pub fn tone_guidance_for(tone: &str) -> &'static str {
    Tone::ALL
        .into_iter()
        .find(|t| t.as_str() == tone)
        .unwrap_or_default()
        .guidance()
}
