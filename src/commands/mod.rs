//! CLI subcommand implementations

mod init;
mod seed;

pub use init::init_config;
pub use seed::seed_dump;
