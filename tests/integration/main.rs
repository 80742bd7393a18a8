//! Integration tests for thank-you-stars

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Binary with no ambient token and a config path inside `home`
    fn stars(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("thank-you-stars");
        cmd.env_remove("GITHUB_TOKEN")
            .env("THANK_YOU_STARS_CONFIG", home.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--include-owner-repo"))
            .stdout(predicate::str::contains("--depth"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("thank-you-stars"));
    }

    #[test]
    fn negative_depth_is_invalid_argument() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .args(["requests", "--depth", "-1", "--token", "x"])
            .assert()
            .code(22)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn missing_token_is_invalid_argument() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .arg("requests")
            .assert()
            .code(22)
            .stderr(predicate::str::contains("Hint:"))
            .stderr(predicate::str::contains("GITHUB_TOKEN"));
    }

    #[test]
    fn invalid_config_is_invalid_argument() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[github\n").unwrap();

        stars(&home).arg("requests").assert().code(22);
    }

    #[test]
    fn directory_without_project_is_not_found() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        stars(&home)
            .arg(project.path())
            .args(["--token", "x"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn debug_conflicts_with_quiet() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .args(["requests", "--debug", "--quiet"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .args(["--check", "--format", "yaml"])
            .assert()
            .failure();
    }

    #[test]
    fn setup_without_terminal_fails() {
        let home = TempDir::new().unwrap();
        stars(&home)
            .args(["requests", "--setup"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("interactive terminal"));
    }
}
