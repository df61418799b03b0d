//! Phone registration with a simulated SMS code.
//!
//! No SMS is sent. After an artificial delay the user is asked for a fixed
//! code, entered one digit per cell.

use std::time::Duration;

use rescue_core::validation::validate_phone_number;
use rescue_core::ValidationError;
use tracing::{debug, info};

/// Number of cells in the code entry.
pub const CODE_LENGTH: usize = 4;

/// Four single-digit cells with a cursor that advances on input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEntry {
    cells: [Option<char>; CODE_LENGTH],
    cursor: usize,
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one cell. Non-digits are ignored; a digit moves the cursor to the
    /// next cell. Returns whether the input was accepted.
    pub fn input(&mut self, index: usize, ch: char) -> bool {
        if index >= CODE_LENGTH || !ch.is_ascii_digit() {
            return false;
        }
        self.cells[index] = Some(ch);
        self.cursor = (index + 1).min(CODE_LENGTH - 1);
        true
    }

    /// Type a digit into the focused cell.
    pub fn push(&mut self, ch: char) -> bool {
        self.input(self.cursor, ch)
    }

    /// Fill cells from a string, as if typed in order.
    pub fn type_str(&mut self, digits: &str) {
        for ch in digits.chars() {
            self.push(ch);
        }
    }

    /// Cell that currently has focus.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entered digits, in cell order, stopping at the first empty cell.
    pub fn code(&self) -> String {
        self.cells.iter().map_while(|c| *c).collect()
    }

    /// Whether all cells hold a digit.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Issues and checks registration codes.
#[derive(Debug, Clone)]
pub struct Verifier {
    code: String,
    delay: Duration,
}

impl Verifier {
    pub fn new(code: impl Into<String>, delay: Duration) -> Self {
        Self {
            code: code.into(),
            delay,
        }
    }

    /// Validate the phone number and wait out the simulated SMS delay.
    ///
    /// Returns the normalised number (whitespace removed).
    pub async fn send_code(&self, phone: &str) -> Result<String, ValidationError> {
        validate_phone_number(phone)?;
        let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

        tokio::time::sleep(self.delay).await;
        info!("Verification code sent to {}", phone);
        debug!("Verification code for {} is {}", phone, self.code);
        Ok(phone)
    }

    /// Check a completed entry against the code.
    pub fn verify(&self, entry: &CodeEntry) -> Result<(), ValidationError> {
        if entry.is_complete() && entry.code() == self.code {
            Ok(())
        } else {
            Err(ValidationError::InvalidCode)
        }
    }
}
