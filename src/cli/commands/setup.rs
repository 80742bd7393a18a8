//! Setup - store a GitHub token in the configuration file

use crate::config::{Config, ConfigManager};
use crate::error::StarsResult;
use crate::ui::{self, UiContext};

/// Prompt for a token, save it, and update `config` for the rest of the run
pub fn execute(ctx: &UiContext, manager: &ConfigManager, config: &mut Config) -> StarsResult<()> {
    ui::intro(ctx, "thank-you-stars setup");
    ui::note(
        ctx,
        "GitHub token",
        "Create a personal access token with the public_repo scope at https://github.com/settings/tokens",
    );

    if config.github.token().is_some()
        && !ui::confirm(ctx, "A token is already configured. Replace it?", false)?
    {
        ui::step_ok(ctx, "Keeping the configured token");
        return Ok(());
    }

    let token = ui::password(ctx, "Personal access token")?;
    config.github.token = Some(token);
    manager.save(config)?;

    ui::step_ok(
        ctx,
        &format!("Token saved to {}", manager.path().display()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn setup_needs_a_terminal() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));
        let mut config = Config::default();

        assert!(execute(&UiContext::non_interactive(), &manager, &mut config).is_err());
        assert!(!manager.path().exists());
    }

    #[test]
    fn existing_token_is_kept_without_a_terminal() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));
        let mut config = Config::default();
        config.github.token = Some("ghp_existing".to_string());

        execute(&UiContext::non_interactive(), &manager, &mut config).unwrap();
        assert_eq!(config.github.token(), Some("ghp_existing"));
    }
}
