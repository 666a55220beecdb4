use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use recipe_forge::cancel::CancelToken;
use recipe_forge::config::{Cli, Command, Config};
use recipe_forge::recipe::card::RecipeCard;
use recipe_forge::recipe::{Recipe, RecipeGenerator, RecipeRequest};
use recipe_forge::server::api::{build_router, AppState};
use recipe_forge::server::metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "recipe_forge=debug,tower_http=debug"
    } else {
        "recipe_forge=info,tower_http=info"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("recipe-forge v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration and pick up the API key from the environment.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen.clone() {
        config.server.listen = listen;
    }
    config.resolve_credentials();
    let config = Arc::new(config);

    info!(
        base_url = config.upstream.base_url,
        model = config.upstream.model,
        timeout_secs = config.upstream.timeout_secs,
        max_retries = config.upstream.max_retries,
        "Configuration loaded"
    );

    let generator = RecipeGenerator::from_config(&config.upstream)?;

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(config, generator).await,
        Command::Generate {
            ingredients,
            time,
            meal,
            diet,
            json,
        } => {
            let request = RecipeRequest {
                ingredients,
                cooking_time: time,
                meal_type: meal,
                dietary_preferences: diet,
            };
            generate_once(&generator, &request, json).await
        }
    }
}

async fn serve(config: Arc<Config>, generator: RecipeGenerator) -> anyhow::Result<()> {
    let shutdown = CancelToken::new();

    // Build application state.
    let state = Arc::new(AppState {
        generator,
        config: config.clone(),
        metrics: Metrics::new()?,
        shutdown: shutdown.clone(),
        start_time: Instant::now(),
    });

    // Build the HTTP router.
    let app = build_router(state);

    let listen_addr = config.server.listen.clone();
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested, cancelling in-flight generations");
                signal.cancel();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {e}"),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn generate_once(
    generator: &RecipeGenerator,
    request: &RecipeRequest,
    json: bool,
) -> anyhow::Result<()> {
    let cancel = CancelToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    let value = generator.generate(request, &cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let recipe = Recipe::from_value(value).context("Completion did not match the recipe shape")?;
        print!("{}", RecipeCard(&recipe));
    }

    Ok(())
}
