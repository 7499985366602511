pub mod apply;
pub mod branch;
pub mod config;
pub mod error;
pub mod gerrit;
pub mod git;
pub mod orchestrator;
pub mod workspace;

pub use apply::{AppliedChange, ApplyExecutor, ApplyOutcome};
pub use branch::BranchTable;
pub use config::{ConfigLoader, Credentials, RunConfig};
pub use error::ApplyError;
pub use gerrit::{ChangeResolver, CherryPickInstruction, GerritClient};
pub use git::{GitClient, VersionControl};
pub use orchestrator::Orchestrator;
