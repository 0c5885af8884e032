use dialoguer::Confirm;

use crate::error::{Error, Result};

/// Interactive prompt mode for CLI operations
#[derive(Debug, Clone, Copy)]
pub enum Prompt {
    /// Console-based interactive prompts using dialoguer
    Console,
    /// Non-interactive mode that uses defaults
    NonInteractive,
}

impl Prompt {
    pub fn new(interactive: bool) -> Self {
        if interactive {
            Self::Console
        } else {
            Self::NonInteractive
        }
    }

    pub fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        match self {
            Prompt::Console => Confirm::new()
                .with_prompt(message)
                .default(default)
                .interact()
                .map_err(|err| Error::InvalidArgument {
                    message: err.to_string(),
                }),
            Prompt::NonInteractive => Ok(default),
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::Console
    }
}
