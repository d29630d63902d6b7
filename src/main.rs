use anyhow::{Context, Result};
use care_interpreter::{
    create_router, AppState, Config, LanguageRegistry, NatsSpeechServices, ServiceSubjects,
    TurnPipeline,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "care-interpreter", about = "Two-way spoken translation for patient visits")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/care-interpreter")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the selectable languages and their codes
    Languages,
    /// Run the HTTP API backed by NATS speech services
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Languages => {
            for name in LanguageRegistry::list_names() {
                let code = LanguageRegistry::resolve(name)?;
                println!("{:<24} {}", name, code);
            }
            Ok(())
        }
        Command::Serve => serve(&cli.config).await,
    }
}

async fn serve(config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path)?;

    info!("Loaded config: {}", cfg.service.name);

    let services = Arc::new(
        NatsSpeechServices::connect(
            &cfg.speech.nats_url,
            ServiceSubjects::from(&cfg.speech),
            cfg.service.name.clone(),
        )
        .await?,
    );

    let pipeline = TurnPipeline::new(services.clone(), services.clone(), services)
        .with_max_capture(cfg.capture.max_duration());

    let mut state = AppState::new(pipeline);
    if let Some(dir) = cfg.export.directory()? {
        info!("Transcripts will be saved to {}", dir.display());
        state = state.with_export_dir(dir);
    }

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
