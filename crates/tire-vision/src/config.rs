//! Provider selection and credentials.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::analyzer::{AnalyzerChain, TireAnalyzer};
use crate::error::{Result, VisionError};
use crate::providers::gemini::{
    GeminiAnalyzer, GeminiRimDesigner, DEFAULT_GEMINI_IMAGE_MODEL, DEFAULT_GEMINI_MODEL,
};
use crate::providers::huggingface::HuggingFaceAnalyzer;
use crate::providers::openai::{OpenAiAnalyzer, DEFAULT_OPENAI_MODEL};
use crate::providers::replicate::{
    ReplicateAnalyzer, ReplicateClient, ReplicateRimDesigner, DEFAULT_RIM_MODEL_VERSION,
};
use crate::rim::RimDesigner;

/// AI backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    HuggingFace,
    OpenAi,
    Gemini,
    Replicate,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::HuggingFace => "huggingface",
            AiProvider::OpenAi => "openai",
            AiProvider::Gemini => "gemini",
            AiProvider::Replicate => "replicate",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = VisionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(AiProvider::HuggingFace),
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            "replicate" => Ok(AiProvider::Replicate),
            _ => Err(VisionError::NotConfigured("unknown AI provider")),
        }
    }
}

/// Configuration for tire analysis and rim design.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Primary analysis provider.
    pub provider: AiProvider,
    pub huggingface_api_key: Option<String>,
    /// Caption models, tried in order. Empty means the defaults.
    pub huggingface_models: Vec<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_image_model: String,
    pub replicate_api_token: Option<String>,
    /// Vision model version for analysis on Replicate.
    pub replicate_model_version: Option<String>,
    pub replicate_rim_version: String,
    /// Whether the rim design screen is offered.
    pub rim_design_enabled: bool,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::HuggingFace,
            huggingface_api_key: None,
            huggingface_models: Vec::new(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_image_model: DEFAULT_GEMINI_IMAGE_MODEL.to_string(),
            replicate_api_token: None,
            replicate_model_version: None,
            replicate_rim_version: DEFAULT_RIM_MODEL_VERSION.to_string(),
            rim_design_enabled: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VisionConfig {
    /// Load configuration from environment variables.
    ///
    /// An unknown `AI_PROVIDER` falls back to HuggingFace with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = match non_empty("AI_PROVIDER") {
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!("Unknown AI_PROVIDER {:?}, using huggingface", value);
                AiProvider::HuggingFace
            }),
            None => AiProvider::HuggingFace,
        };

        let huggingface_models = non_empty("HUGGINGFACE_MODELS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let rim_design_enabled = non_empty("EB_RESCUE_RIM_DESIGN")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Self {
            provider,
            huggingface_api_key: non_empty("HUGGINGFACE_API_KEY"),
            huggingface_models,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_image_model: defaults.gemini_image_model,
            replicate_api_token: non_empty("REPLICATE_API_TOKEN"),
            replicate_model_version: non_empty("REPLICATE_MODEL_VERSION"),
            replicate_rim_version: defaults.replicate_rim_version,
            rim_design_enabled,
            request_timeout: defaults.request_timeout,
        }
    }

    /// Create a builder for VisionConfig.
    pub fn builder() -> VisionConfigBuilder {
        VisionConfigBuilder::default()
    }

    fn huggingface(&self) -> Result<HuggingFaceAnalyzer> {
        HuggingFaceAnalyzer::new(
            self.huggingface_api_key.clone(),
            self.huggingface_models.clone(),
            self.request_timeout,
        )
    }

    fn analyzer(&self, provider: AiProvider) -> Result<Box<dyn TireAnalyzer>> {
        Ok(match provider {
            AiProvider::HuggingFace => Box::new(self.huggingface()?),
            AiProvider::OpenAi => {
                let key = self
                    .openai_api_key
                    .clone()
                    .ok_or(VisionError::NotConfigured("OPENAI_API_KEY"))?;
                Box::new(OpenAiAnalyzer::new(key, &self.openai_model, self.request_timeout)?)
            }
            AiProvider::Gemini => {
                let key = self
                    .gemini_api_key
                    .clone()
                    .ok_or(VisionError::NotConfigured("GEMINI_API_KEY"))?;
                Box::new(GeminiAnalyzer::new(key, &self.gemini_model, self.request_timeout)?)
            }
            AiProvider::Replicate => {
                let version = self
                    .replicate_model_version
                    .clone()
                    .ok_or(VisionError::NotConfigured("REPLICATE_MODEL_VERSION"))?;
                Box::new(ReplicateAnalyzer::new(self.replicate()?, version))
            }
        })
    }

    fn replicate(&self) -> Result<ReplicateClient> {
        let token = self
            .replicate_api_token
            .clone()
            .ok_or(VisionError::NotConfigured("REPLICATE_API_TOKEN"))?;
        ReplicateClient::new(token, self.request_timeout)
    }

    /// Build the analysis chain: the selected provider, then HuggingFace.
    ///
    /// A primary that cannot be built is skipped with a warning, so the
    /// chain always has at least the HuggingFace step when it can be built.
    pub fn build_chain(&self) -> AnalyzerChain {
        let primary = match self.analyzer(self.provider) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                warn!("Primary AI provider {} unavailable: {}", self.provider, e);
                None
            }
        };

        let fallback = if self.provider == AiProvider::HuggingFace && primary.is_some() {
            None
        } else {
            match self.huggingface() {
                Ok(analyzer) => Some(Box::new(analyzer) as Box<dyn TireAnalyzer>),
                Err(e) => {
                    warn!("HuggingFace fallback unavailable: {}", e);
                    None
                }
            }
        };

        let chain = AnalyzerChain::new(primary, fallback);
        info!("Tire analysis providers: {:?}", chain.providers());
        chain
    }

    /// Build the rim designer, when enabled and some backend has credentials.
    ///
    /// Gemini is used when it is the selected provider; otherwise Replicate is
    /// preferred, then Gemini.
    pub fn build_rim_designer(&self) -> Option<Box<dyn RimDesigner>> {
        if !self.rim_design_enabled {
            return None;
        }

        let gemini = || -> Option<Box<dyn RimDesigner>> {
            let key = self.gemini_api_key.clone()?;
            GeminiRimDesigner::new(key, &self.gemini_image_model, self.request_timeout)
                .map_err(|e| warn!("Gemini rim designer unavailable: {}", e))
                .ok()
                .map(|d| Box::new(d) as Box<dyn RimDesigner>)
        };
        let replicate = || -> Option<Box<dyn RimDesigner>> {
            self.replicate_api_token.as_ref()?;
            self.replicate()
                .map_err(|e| warn!("Replicate rim designer unavailable: {}", e))
                .ok()
                .map(|client| {
                    Box::new(ReplicateRimDesigner::new(client, &self.replicate_rim_version))
                        as Box<dyn RimDesigner>
                })
        };

        let designer = if self.provider == AiProvider::Gemini {
            gemini().or_else(replicate)
        } else {
            replicate().or_else(gemini)
        };

        if designer.is_none() {
            warn!("Rim design enabled but no image backend is configured");
        }
        designer
    }
}

/// Builder for VisionConfig.
#[derive(Debug, Default)]
pub struct VisionConfigBuilder {
    config: VisionConfig,
}

impl VisionConfigBuilder {
    pub fn provider(mut self, provider: AiProvider) -> Self {
        self.config.provider = provider;
        self
    }

    pub fn huggingface_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.huggingface_api_key = Some(key.into());
        self
    }

    pub fn huggingface_models(mut self, models: Vec<String>) -> Self {
        self.config.huggingface_models = models;
        self
    }

    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_api_key = Some(key.into());
        self
    }

    pub fn openai_model(mut self, model: impl Into<String>) -> Self {
        self.config.openai_model = model.into();
        self
    }

    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gemini_api_key = Some(key.into());
        self
    }

    pub fn replicate_api_token(mut self, token: impl Into<String>) -> Self {
        self.config.replicate_api_token = Some(token.into());
        self
    }

    pub fn replicate_model_version(mut self, version: impl Into<String>) -> Self {
        self.config.replicate_model_version = Some(version.into());
        self
    }

    pub fn rim_design(mut self, enabled: bool) -> Self {
        self.config.rim_design_enabled = enabled;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> VisionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
        assert_eq!(" gemini ".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert_eq!("hf".parse::<AiProvider>().unwrap(), AiProvider::HuggingFace);
        assert!("deepseek".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_default_chain_is_huggingface_only() {
        let chain = VisionConfig::default().build_chain();
        assert_eq!(chain.providers(), vec!["huggingface"]);
    }

    #[test]
    fn test_configured_primary_then_huggingface() {
        let config = VisionConfig::builder()
            .provider(AiProvider::OpenAi)
            .openai_api_key("sk-test")
            .build();
        assert_eq!(config.build_chain().providers(), vec!["openai", "huggingface"]);
    }

    #[test]
    fn test_unconfigured_primary_is_skipped() {
        let config = VisionConfig::builder().provider(AiProvider::Gemini).build();
        assert_eq!(config.build_chain().providers(), vec!["huggingface"]);

        let config = VisionConfig::builder()
            .provider(AiProvider::Replicate)
            .replicate_api_token("r8_test")
            .build();
        // Token alone is not enough without a model version
        assert_eq!(config.build_chain().providers(), vec!["huggingface"]);
    }

    #[test]
    fn test_rim_designer_selection() {
        assert!(VisionConfig::default().build_rim_designer().is_none());

        let config = VisionConfig::builder().rim_design(true).build();
        assert!(config.build_rim_designer().is_none());

        let config = VisionConfig::builder()
            .rim_design(true)
            .gemini_api_key("g")
            .replicate_api_token("r")
            .build();
        assert_eq!(config.build_rim_designer().unwrap().name(), "replicate");

        let config = VisionConfig::builder()
            .provider(AiProvider::Gemini)
            .rim_design(true)
            .gemini_api_key("g")
            .replicate_api_token("r")
            .build();
        assert_eq!(config.build_rim_designer().unwrap().name(), "gemini");
    }

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear() {
            for name in [
                "AI_PROVIDER",
                "HUGGINGFACE_API_KEY",
                "HUGGINGFACE_MODELS",
                "OPENAI_API_KEY",
                "OPENAI_MODEL",
                "GEMINI_API_KEY",
                "GEMINI_MODEL",
                "REPLICATE_API_TOKEN",
                "REPLICATE_MODEL_VERSION",
                "EB_RESCUE_RIM_DESIGN",
            ] {
                std::env::remove_var(name);
            }
        }

        clear();
        let config = VisionConfig::from_env();
        assert_eq!(config.provider, AiProvider::HuggingFace);
        assert!(config.huggingface_models.is_empty());
        assert_eq!(config.openai_model, "gpt-4-vision-preview");
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert!(!config.rim_design_enabled);

        std::env::set_var("AI_PROVIDER", "openai");
        std::env::set_var("HUGGINGFACE_MODELS", "a/b, c/d ,");
        std::env::set_var("EB_RESCUE_RIM_DESIGN", "TRUE");
        let config = VisionConfig::from_env();
        assert_eq!(config.provider, AiProvider::OpenAi);
        assert_eq!(config.huggingface_models, vec!["a/b", "c/d"]);
        assert!(config.rim_design_enabled);

        std::env::set_var("AI_PROVIDER", "deepseek");
        assert_eq!(VisionConfig::from_env().provider, AiProvider::HuggingFace);

        clear();
    }
}
