use serde::{Deserialize, Serialize};
use tracing::info;

use super::log::Speaker;
use crate::error::Result;
use crate::language::{LanguageCode, LanguageRegistry};

/// The four language names as picked by the user, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSelection {
    /// Language the patient speaks
    pub patient_speaks: String,

    /// Language the patient wants to hear
    pub patient_hears: String,

    /// Language the healthcare provider speaks
    pub provider_speaks: String,

    /// Language the healthcare provider wants to hear
    pub provider_hears: String,
}

impl LanguageSelection {
    pub fn new(
        patient_speaks: impl Into<String>,
        patient_hears: impl Into<String>,
        provider_speaks: impl Into<String>,
        provider_hears: impl Into<String>,
    ) -> Self {
        Self {
            patient_speaks: patient_speaks.into(),
            patient_hears: patient_hears.into(),
            provider_speaks: provider_speaks.into(),
            provider_hears: provider_hears.into(),
        }
    }

    /// Resolve all four names; see [`SessionConfiguration::confirm`]
    pub fn confirm(&self) -> Result<SessionConfiguration> {
        SessionConfiguration::confirm(
            &self.patient_speaks,
            &self.patient_hears,
            &self.provider_speaks,
            &self.provider_hears,
        )
    }
}

/// Confirmed language codes for a session
///
/// Built in one step from a full selection and never modified afterwards. A
/// different set of languages means a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfiguration {
    patient_speaks: LanguageCode,
    patient_hears: LanguageCode,
    provider_speaks: LanguageCode,
    provider_hears: LanguageCode,
}

impl SessionConfiguration {
    /// Resolve the four language names through the registry.
    ///
    /// Fails with `UnknownLanguage` naming the first name that is not in the
    /// registry. Nothing is returned unless all four resolve.
    pub fn confirm(
        patient_speaks: &str,
        patient_hears: &str,
        provider_speaks: &str,
        provider_hears: &str,
    ) -> Result<Self> {
        let config = Self {
            patient_speaks: LanguageRegistry::resolve(patient_speaks)?,
            patient_hears: LanguageRegistry::resolve(patient_hears)?,
            provider_speaks: LanguageRegistry::resolve(provider_speaks)?,
            provider_hears: LanguageRegistry::resolve(provider_hears)?,
        };

        info!(
            "Languages confirmed: patient {} -> {}, provider {} -> {}",
            config.patient_speaks, config.patient_hears, config.provider_speaks, config.provider_hears
        );

        Ok(config)
    }

    pub fn patient_speaks(&self) -> &LanguageCode {
        &self.patient_speaks
    }

    pub fn patient_hears(&self) -> &LanguageCode {
        &self.patient_hears
    }

    pub fn provider_speaks(&self) -> &LanguageCode {
        &self.provider_speaks
    }

    pub fn provider_hears(&self) -> &LanguageCode {
        &self.provider_hears
    }

    /// (spoken, output) codes for a turn by `speaker`: what they speak, and
    /// what the other party wants to hear
    pub fn language_pair_for(&self, speaker: Speaker) -> (&LanguageCode, &LanguageCode) {
        match speaker {
            Speaker::Patient => (&self.patient_speaks, &self.provider_hears),
            Speaker::Provider => (&self.provider_speaks, &self.patient_hears),
        }
    }

    /// One `Label: Name (code)` line per field, for echoing the confirmed choice
    pub fn describe(&self) -> Vec<String> {
        [
            ("Patient Language", &self.patient_speaks),
            ("Patient desired Language", &self.patient_hears),
            ("Healthcare Language", &self.provider_speaks),
            ("Healthcare desired Language", &self.provider_hears),
        ]
        .into_iter()
        .map(|(label, code)| {
            let name = LanguageRegistry::name_of(code).unwrap_or("Unknown");
            format!("{}: {} ({})", label, name, code)
        })
        .collect()
    }
}
