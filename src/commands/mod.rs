//! CLI command implementations.
//!
//! - **merge**: expand a pipeline and write the composed document
//! - **init**: write a default `.pipeweave.toml`

pub mod init;
pub mod merge;

pub use init::init_config;
pub use merge::{handle_merge, MergeConfig};
