//! Link opener trait and implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{DispatchError, Result};

/// Hands a deep link to whatever can open it.
///
/// Abstracted to support different environments (desktop, terminal, tests).
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// Open a `https://` or `mailto:` link.
    async fn open(&self, url: &str) -> Result<()>;
}

/// Discards every link.
#[derive(Debug, Clone, Default)]
pub struct NoOpOpener;

#[async_trait]
impl LinkOpener for NoOpOpener {
    async fn open(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// Logs every link so it can be copied from the terminal.
#[derive(Debug, Clone, Default)]
pub struct LoggingOpener;

#[async_trait]
impl LinkOpener for LoggingOpener {
    async fn open(&self, url: &str) -> Result<()> {
        info!("Open link: {}", url);
        Ok(())
    }
}

/// Runs an external program with the link as its only argument,
/// e.g. `xdg-open` or `open`.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl LinkOpener for CommandOpener {
    async fn open(&self, url: &str) -> Result<()> {
        info!("Opening link with {}", self.program);
        let status = Command::new(&self.program).arg(url).status().await?;
        if !status.success() {
            return Err(DispatchError::OpenFailed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Keeps every link it is asked to open, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_opener_keeps_order() {
        let opener = RecordingOpener::new();
        let shared = opener.clone();

        opener.open("https://wa.me/1?text=a").await.unwrap();
        shared.open("mailto:x@y.z").await.unwrap();

        assert_eq!(
            opener.opened(),
            vec!["https://wa.me/1?text=a".to_string(), "mailto:x@y.z".to_string()]
        );
    }

    #[tokio::test]
    async fn test_noop_and_logging_succeed() {
        assert!(NoOpOpener.open("https://wa.me/1").await.is_ok());
        assert!(LoggingOpener.open("https://wa.me/1").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_command_fails() {
        let opener = CommandOpener::new("eb-rescue-no-such-opener");
        assert!(matches!(
            opener.open("https://wa.me/1").await,
            Err(DispatchError::Io(_))
        ));
    }
}
