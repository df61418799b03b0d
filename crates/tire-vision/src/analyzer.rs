//! The tire analysis seam and its fallback policy.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::condition::ANALYSIS_UNAVAILABLE;
use crate::error::Result;

/// Something that can describe a tire photo's condition.
#[async_trait]
pub trait TireAnalyzer: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Analyse a photo given as a data URL. Returns short Traditional
    /// Chinese advice.
    async fn analyze(&self, image: &str) -> Result<String>;
}

/// Primary provider with one fallback and a static last resort.
///
/// Analysis never fails from the caller's point of view: when both
/// providers error the result is [`ANALYSIS_UNAVAILABLE`].
pub struct AnalyzerChain {
    primary: Option<Box<dyn TireAnalyzer>>,
    fallback: Option<Box<dyn TireAnalyzer>>,
}

impl AnalyzerChain {
    pub fn new(
        primary: Option<Box<dyn TireAnalyzer>>,
        fallback: Option<Box<dyn TireAnalyzer>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// A chain that always yields the unavailable notice.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Names of the providers, primary first.
    pub fn providers(&self) -> Vec<&'static str> {
        self.primary
            .iter()
            .chain(self.fallback.iter())
            .map(|a| a.name())
            .collect()
    }

    pub async fn analyze(&self, image: &str) -> String {
        for analyzer in self.primary.iter().chain(self.fallback.iter()) {
            match analyzer.analyze(image).await {
                Ok(text) => {
                    info!("Tire analysis from {}", analyzer.name());
                    return text;
                }
                Err(e) => warn!("[{}] Analysis failed: {}", analyzer.name(), e),
            }
        }

        ANALYSIS_UNAVAILABLE.to_string()
    }
}

impl std::fmt::Debug for AnalyzerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerChain")
            .field("providers", &self.providers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisionError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Stub {
        name: &'static str,
        answer: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl Stub {
        fn boxed(
            name: &'static str,
            answer: Option<&'static str>,
        ) -> (Box<dyn TireAnalyzer>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Stub {
                name,
                answer,
                calls: calls.clone(),
            };
            (Box::new(stub), calls)
        }
    }

    #[async_trait]
    impl TireAnalyzer for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn analyze(&self, _image: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .map(str::to_string)
                .ok_or(VisionError::EmptyResponse(self.name))
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, _) = Stub::boxed("openai", Some("primary"));
        let (fallback, fallback_calls) = Stub::boxed("huggingface", Some("fallback"));
        let chain = AnalyzerChain::new(Some(primary), Some(fallback));

        assert_eq!(chain.analyze("data:image/jpeg;base64,AA").await, "primary");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_once() {
        let (primary, primary_calls) = Stub::boxed("openai", None);
        let (fallback, _) = Stub::boxed("huggingface", Some("fallback"));
        let chain = AnalyzerChain::new(Some(primary), Some(fallback));

        assert_eq!(chain.analyze("x").await, "fallback");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_fail_gives_static_text() {
        let (primary, _) = Stub::boxed("openai", None);
        let (fallback, _) = Stub::boxed("huggingface", None);
        let chain = AnalyzerChain::new(Some(primary), Some(fallback));

        assert_eq!(chain.analyze("x").await, ANALYSIS_UNAVAILABLE);
        assert_eq!(AnalyzerChain::disabled().analyze("x").await, ANALYSIS_UNAVAILABLE);
    }

    #[test]
    fn test_provider_names() {
        let (primary, _) = Stub::boxed("gemini", None);
        let chain = AnalyzerChain::new(Some(primary), None);
        assert_eq!(chain.providers(), vec!["gemini"]);
    }
}
