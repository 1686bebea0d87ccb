use anyhow::Context as _;
use clap::Parser as _;
use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use std::path::PathBuf;
use tracing::{error, info};

mod db;
mod modules;
mod services;

use services::config::BotConfig;
use services::snapshots::InviteSnapshotService;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the bot configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Rollback the specified number of migrations and run all migrations again.
    #[arg(long, num_args = 0..=1, default_missing_value = "1")]
    refresh_migrations: Option<u32>,
}

// Custom user data passed to all command and event handlers
pub struct Data {
    pub db: sea_orm::DatabaseConnection,
    pub config: BotConfig,
    pub invites: InviteSnapshotService,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    if let Err(e) = poise::builtins::on_error(error).await {
        error!("Error while handling error: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    let config = BotConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let filter = config
        .log_level
        .clone()
        .unwrap_or_else(|| "invite_ledger=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    info!("Starting invite ledger bot...");

    // Establish database connection
    let db = db::establish_connection()
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    if let Some(depth) = args.refresh_migrations {
        info!("Refreshing migrations (down {}, then up)...", depth);
        db::migrations::Migrator::down(&db, Some(depth))
            .await
            .context("Failed to rollback migration")?;
    }

    db::migrations::Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;

    let token = std::env::var("DISCORD_TOKEN").context("missing DISCORD_TOKEN")?;
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    for module in modules::get_modules() {
        info!("Registered module: {}", module.definition.name);
    }

    let prefix = config.prefix.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: modules::commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ignore_bots: true,
                ..Default::default()
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(modules::dispatch_event(ctx, event, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| {
            Box::pin(async move {
                Ok(Data {
                    db,
                    config,
                    invites: InviteSnapshotService::new(),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    client.start().await.context("Client error")?;

    Ok(())
}
