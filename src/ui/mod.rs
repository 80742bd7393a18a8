//! UI module for consistent CLI output
//!
//! Uses `cliclack` for prompts and spinners and `indicatif` for the
//! resolution bar, with plain output (or none) in CI/non-interactive
//! environments. Report data is printed by the command itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use thank_you_stars::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect().with_quiet(args.quiet);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Collect package info");
//! // ... walk dependencies ...
//! spinner.stop("Collected 12 packages");
//!
//! ui::outro_success(&ctx, "Starred 3 repositories");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{intro, note, outro_success, outro_warn, step_ok, step_warn_hint};
pub use progress::{ResolveProgress, TaskSpinner};
pub use prompts::{confirm, password};
pub use theme::{init_theme, StarsTheme};
