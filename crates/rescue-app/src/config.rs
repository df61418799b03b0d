//! Application configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::verify::CODE_LENGTH;

/// Default SQLite location for the session store.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:eb_rescue.db?mode=rwc";

/// Fixed verification code accepted at registration.
pub const DEFAULT_VERIFICATION_CODE: &str = "8888";

/// Simulated SMS delay before the code can be entered.
pub const DEFAULT_CODE_DELAY: Duration = Duration::from_millis(1500);

/// Delay before the review notification link is opened.
pub const DEFAULT_REVIEW_LINK_DELAY: Duration = Duration::from_millis(1000);

/// Delay between the WhatsApp link and the booking e-mail link.
pub const DEFAULT_MAILTO_DELAY: Duration = Duration::from_millis(800);

/// Router and front-end settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub verification_code: String,
    pub code_delay: Duration,
    pub review_link_delay: Duration,
    pub mailto_delay: Duration,
    /// Whether logout also wipes the repair history.
    pub clear_history_on_logout: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            verification_code: DEFAULT_VERIFICATION_CODE.to_string(),
            code_delay: DEFAULT_CODE_DELAY,
            review_link_delay: DEFAULT_REVIEW_LINK_DELAY,
            mailto_delay: DEFAULT_MAILTO_DELAY,
            clear_history_on_logout: false,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    let value = non_empty(name)?;
    match value.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", name, value);
            None
        }
    }
}

/// A verification code must fill the code entry exactly.
fn verification_code(name: &str) -> Option<String> {
    let value = non_empty(name)?;
    if value.len() == CODE_LENGTH && value.chars().all(|c| c.is_ascii_digit()) {
        Some(value)
    } else {
        warn!(
            "Ignoring invalid {}={:?}, expected {} digits",
            name, value, CODE_LENGTH
        );
        None
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_url: non_empty("EB_RESCUE_DATABASE_URL").unwrap_or(defaults.database_url),
            verification_code: verification_code("EB_RESCUE_VERIFICATION_CODE")
                .unwrap_or(defaults.verification_code),
            code_delay: millis("EB_RESCUE_CODE_DELAY_MS").unwrap_or(defaults.code_delay),
            review_link_delay: millis("EB_RESCUE_REVIEW_LINK_DELAY_MS")
                .unwrap_or(defaults.review_link_delay),
            mailto_delay: millis("EB_RESCUE_MAILTO_DELAY_MS").unwrap_or(defaults.mailto_delay),
            clear_history_on_logout: non_empty("EB_RESCUE_CLEAR_HISTORY_ON_LOGOUT")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }

    /// Create a builder for AppConfig.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Builder for AppConfig.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn verification_code(mut self, code: impl Into<String>) -> Self {
        self.config.verification_code = code.into();
        self
    }

    pub fn code_delay(mut self, delay: Duration) -> Self {
        self.config.code_delay = delay;
        self
    }

    pub fn review_link_delay(mut self, delay: Duration) -> Self {
        self.config.review_link_delay = delay;
        self
    }

    pub fn mailto_delay(mut self, delay: Duration) -> Self {
        self.config.mailto_delay = delay;
        self
    }

    pub fn clear_history_on_logout(mut self, clear: bool) -> Self {
        self.config.clear_history_on_logout = clear;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .verification_code("1234")
            .code_delay(Duration::ZERO)
            .clear_history_on_logout(true)
            .build();

        assert_eq!(config.verification_code, "1234");
        assert_eq!(config.code_delay, Duration::ZERO);
        assert!(config.clear_history_on_logout);
        assert_eq!(config.review_link_delay, DEFAULT_REVIEW_LINK_DELAY);
    }

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear() {
            for name in [
                "EB_RESCUE_DATABASE_URL",
                "EB_RESCUE_VERIFICATION_CODE",
                "EB_RESCUE_CODE_DELAY_MS",
                "EB_RESCUE_REVIEW_LINK_DELAY_MS",
                "EB_RESCUE_MAILTO_DELAY_MS",
                "EB_RESCUE_CLEAR_HISTORY_ON_LOGOUT",
            ] {
                std::env::remove_var(name);
            }
        }

        clear();
        let config = AppConfig::from_env();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.verification_code, "8888");
        assert_eq!(config.code_delay, Duration::from_millis(1500));
        assert_eq!(config.review_link_delay, Duration::from_millis(1000));
        assert!(!config.clear_history_on_logout);

        for code in ["12345", "abcd", "88 8"] {
            std::env::set_var("EB_RESCUE_VERIFICATION_CODE", code);
            assert_eq!(AppConfig::from_env().verification_code, DEFAULT_VERIFICATION_CODE);
        }
        std::env::set_var("EB_RESCUE_VERIFICATION_CODE", "1234");
        assert_eq!(AppConfig::from_env().verification_code, "1234");

        std::env::set_var("EB_RESCUE_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("EB_RESCUE_CODE_DELAY_MS", "0");
        std::env::set_var("EB_RESCUE_REVIEW_LINK_DELAY_MS", "later");
        std::env::set_var("EB_RESCUE_MAILTO_DELAY_MS", "250");
        std::env::set_var("EB_RESCUE_CLEAR_HISTORY_ON_LOGOUT", "1");
        let config = AppConfig::from_env();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.code_delay, Duration::ZERO);
        assert_eq!(config.review_link_delay, DEFAULT_REVIEW_LINK_DELAY);
        assert_eq!(config.mailto_delay, Duration::from_millis(250));
        assert!(config.clear_history_on_logout);

        clear();
    }
}
