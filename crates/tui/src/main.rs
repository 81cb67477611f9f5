use std::{fs::OpenOptions, process::ExitCode, sync::Mutex};

use engine::MemoryGateway;
use spendboard_tui::{
    app::App,
    check,
    client::SupabaseClient,
    config::{self, AppConfig, Command},
    error::Result,
};

fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendboard_tui={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let invocation = config::load()?;
    let config = invocation.config;
    init_tracing(&config)?;

    if config.demo {
        tracing::info!("Running with demo data...");
        let gateway = MemoryGateway::demo(config.today()?);
        return launch(&config, invocation.command, gateway, "demo").await;
    }

    let (url, key) = config.connection()?;
    tracing::info!("Using backend at {url}");
    let gateway = SupabaseClient::new(url, key)?;
    launch(&config, invocation.command, gateway, url).await
}

async fn launch<G: engine::Gateway>(
    config: &AppConfig,
    command: Option<Command>,
    gateway: G,
    source: &str,
) -> Result<ExitCode> {
    match command {
        Some(Command::Check) => {
            let passed = check::run(&gateway, config.currency()?, &mut std::io::stdout()).await?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            let mut app = App::new(config, gateway, source)?;
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
