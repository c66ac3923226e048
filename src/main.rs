use clap::Parser;
use serde::Serialize;
use sources_api::utils::{logger, validation::Validate};
use sources_api::{
    install_api, ClientSettings, CliConfig, Command, ErrorKind, SourcesClient, SourcesError,
    SourcesService,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    let (settings, file_config) = match config.resolve().and_then(|resolved| {
        resolved.0.validate()?;
        if let Some(file) = &resolved.1 {
            file.validate()?;
        }
        Ok(resolved)
    }) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    let json_logs = config.json_logs || file_config.as_ref().map(|f| f.json_logs()).unwrap_or(false);
    let log_level = file_config.as_ref().and_then(|f| f.log_level());
    if json_logs {
        logger::init_json_logger(config.verbose, log_level);
    } else {
        logger::init_cli_logger(config.verbose, log_level);
    }

    tracing::info!("Starting sources-api CLI against {}", settings.base_url);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let api = match setup_api(&settings) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("❌ Could not set up the Sources client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };
    let service = SourcesService::from_shared(api);

    match run(&service, config.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("❌ Request failed: {} (Kind: {:?})", e, e.kind());
            eprintln!("{}", serde_json::to_string_pretty(&e.to_ui_error())?);
            std::process::exit(exit_code(&e));
        }
    }
}

async fn run(service: &SourcesService<SourcesClient>, command: Command) -> sources_api::Result<()> {
    match command {
        Command::AppTypes => print_json(&service.load_app_types().await?),
        list @ Command::List { .. } => {
            let query = list.entities_query().unwrap_or_default();
            print_json(&service.load_entities(&query).await?)
        }
        Command::Show { id } => print_json(&service.load_source(&id).await?),
        Command::Edit { id } => print_json(&service.load_source_for_edit(&id).await?),
        Command::Count { filter } => {
            let sources = service.load_count_of_sources(&filter.into()).await?;
            print_json(&serde_json::json!({ "count": sources.count() }))
        }
        Command::Remove { id } => {
            service.remove_source(&id).await?;
            println!("✅ Source {} removed", id);
            Ok(())
        }
        Command::CreateApp {
            source_id,
            application_type_id,
        } => print_json(
            &service
                .create_application(&source_id, &application_type_id)
                .await?,
        ),
        Command::DeleteApp { id, error_message } => {
            service.delete_application(&id, &error_message).await?;
            println!("✅ Application {} removed", id);
            Ok(())
        }
    }
}

fn setup_api(settings: &ClientSettings) -> sources_api::Result<Arc<SourcesClient>> {
    install_api(SourcesClient::from_config(settings)?)
}

fn print_json<T: Serialize>(value: &T) -> sources_api::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(e: &SourcesError) -> i32 {
    match e.kind() {
        ErrorKind::Operation | ErrorKind::Http | ErrorKind::Application => 1,
        ErrorKind::Config => 2,
        ErrorKind::Transport | ErrorKind::Io | ErrorKind::Serialization => 3,
    }
}
