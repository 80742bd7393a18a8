//! CLI command implementations

pub mod report;
pub mod run;
pub mod setup;

pub use run::execute as run;
pub use setup::execute as setup;
