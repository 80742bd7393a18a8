//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{StarsError, StarsResult};

/// Prompt for confirmation, returns default if non-interactive
pub fn confirm(ctx: &UiContext, message: &str, default: bool) -> StarsResult<bool> {
    if !ctx.is_interactive() {
        return Ok(default);
    }

    cliclack::confirm(message)
        .initial_value(default)
        .interact()
        .map_err(|e| StarsError::User(format!("Prompt failed: {}", e)))
}

/// Prompt for a secret; requires a terminal
pub fn password(ctx: &UiContext, message: &str) -> StarsResult<String> {
    if !ctx.is_interactive() {
        return Err(StarsError::User(
            "--setup needs an interactive terminal".to_string(),
        ));
    }

    cliclack::password(message)
        .mask('▪')
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a token")
            } else {
                Ok(())
            }
        })
        .interact()
        .map(|token| token.trim().to_string())
        .map_err(|e| StarsError::User(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        assert!(confirm(&ctx, "Test?", true).unwrap());
        assert!(!confirm(&ctx, "Test?", false).unwrap());
    }

    #[test]
    fn password_needs_terminal() {
        let ctx = UiContext::non_interactive();
        assert!(password(&ctx, "Token").is_err());
    }
}
