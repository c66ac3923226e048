pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::config::{toml_config::TomlConfig, ClientSettings};
pub use crate::core::{
    accessor::{get_api, install_api},
    client::SourcesClient,
    service::SourcesService,
    transport::Transport,
};
pub use crate::utils::error::{ErrorKind, Result, SourcesError, UiError};
