use crate::config::toml_config::TomlConfig;
use crate::config::{ClientSettings, API_BASE_ENV, DEFAULT_API_BASE};
use crate::domain::model::{EntitiesQuery, FilterValue};
use crate::utils::error::{Result, SourcesError};
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sources-api")]
#[command(about = "Query and edit sources through the Sources API")]
pub struct CliConfig {
    #[arg(long, env = API_BASE_ENV, help = "API base path, e.g. https://host/api/sources/v1.0")]
    pub base_url: Option<String>,

    #[arg(long, help = "TOML config file with an [api] section")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long = "header", value_name = "NAME=VALUE", help = "Extra request header, repeatable")]
    pub headers: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List application types
    AppTypes,
    /// List sources through GraphQL
    List {
        #[arg(long, default_value = "50")]
        page_size: i64,
        #[arg(long, default_value = "1")]
        page: i64,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long, default_value = "asc")]
        sort_direction: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one source with its applications and endpoints
    Show { id: String },
    /// Load a source with endpoints, authentications and applications
    Edit { id: String },
    /// Count sources matching a filter
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Delete a source
    Remove { id: String },
    /// Attach an application type to a source
    CreateApp {
        source_id: String,
        application_type_id: String,
    },
    /// Delete an application
    DeleteApp {
        id: String,
        #[arg(long, default_value = "Application removal failed")]
        error_message: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long, help = "Case-insensitive name substring")]
    pub name: Option<String>,

    #[arg(long = "source-type", value_delimiter = ',', help = "Source type ids")]
    pub source_type_id: Vec<String>,
}

impl From<FilterArgs> for FilterValue {
    fn from(args: FilterArgs) -> Self {
        FilterValue {
            name: args.name,
            source_type_id: args.source_type_id,
        }
    }
}

impl Command {
    pub fn entities_query(&self) -> Option<EntitiesQuery> {
        match self {
            Command::List {
                page_size,
                page,
                sort_by,
                sort_direction,
                filter,
            } => Some(EntitiesQuery {
                page_size: *page_size,
                page_number: *page,
                sort_by: sort_by.clone(),
                sort_direction: sort_direction.clone(),
                filter_value: filter.clone().into(),
            }),
            _ => None,
        }
    }
}

impl CliConfig {
    /// 合併設定來源：TOML 檔案為底，再套用命令列參數
    pub fn resolve(&self) -> Result<(ClientSettings, Option<TomlConfig>)> {
        let file_config = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let mut settings = match &file_config {
            Some(file) => ClientSettings {
                base_url: file.api.base_url.clone(),
                timeout_seconds: file.api.timeout_seconds,
                headers: file.api.headers.clone(),
            },
            None => ClientSettings::new(DEFAULT_API_BASE),
        };

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = Some(timeout);
        }
        for (name, value) in self.parsed_headers()? {
            settings.headers.insert(name, value);
        }

        Ok((settings, file_config))
    }

    fn parsed_headers(&self) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .map(|raw| {
                raw.split_once('=')
                    .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                    .ok_or_else(|| SourcesError::InvalidConfigValueError {
                        field: "header".to_string(),
                        value: raw.clone(),
                        reason: "Expected NAME=VALUE".to_string(),
                    })
            })
            .collect()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            validation::validate_url("base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout {
            validation::validate_positive_number("timeout", timeout, 1)?;
        }
        for (name, value) in self.parsed_headers()? {
            validation::validate_header(&name, &value)?;
        }

        match &self.command {
            Command::Show { id } | Command::Edit { id } | Command::Remove { id } => {
                validation::validate_non_empty_string("id", id)?
            }
            Command::DeleteApp { id, .. } => validation::validate_non_empty_string("id", id)?,
            Command::CreateApp {
                source_id,
                application_type_id,
            } => {
                validation::validate_non_empty_string("source_id", source_id)?;
                validation::validate_non_empty_string("application_type_id", application_type_id)?;
            }
            Command::AppTypes | Command::List { .. } | Command::Count { .. } => {}
        }

        Ok(())
    }
}
