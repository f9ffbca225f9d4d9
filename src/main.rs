//! Application entry point for arrcord.
//!
//! Initializes all components, starts the Discord bot and the webhook
//! ingress server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::error;
use log::info;

use arrcord::bot::Bot;
use arrcord::config::Config;
use arrcord::database::Database;
use arrcord::i18n::Translator;
use arrcord::logging::setup_logging;
use arrcord::media::OverseerrClient;
use arrcord::media::RadarrClient;
use arrcord::media::SonarrClient;
use arrcord::server;
use arrcord::server::AppState;
use arrcord::service::Services;
use arrcord::webhook::context::NotifyContext;
use arrcord::webhook::gateway::DiscordGateway;
use arrcord::webhook::router::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let db = setup_database(&config, init_start).await?;
    let services = Arc::new(Services::new(db.clone(), &config));

    let overseerr = Arc::new(OverseerrClient::new(&config.overseerr));
    let radarr = Arc::new(RadarrClient::new(&config.radarr));
    let sonarr = Arc::new(SonarrClient::new(&config.sonarr));

    let bot = setup_bot(&config, services.clone(), radarr, sonarr, init_start).await?;

    let translator = match &config.translations_path {
        Some(path) => Translator::load_dir(path, &config.locale),
        None => Translator::new(&config.locale),
    };

    let notify = Arc::new(NotifyContext::new(
        config.clone(),
        Arc::new(DiscordGateway::new(bot.http.clone(), bot.cache.clone())),
        overseerr,
        services.settings.clone(),
        Arc::new(translator),
    ));

    setup_server(&config, notify);

    run(init_start).await
}

fn load_config() -> Result<Arc<Config>> {
    let config = Arc::new(Config::load()?);
    setup_logging(&config)?;
    info!("Starting arrcord...");
    Ok(config)
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Database>> {
    debug!("Setting up Database...");
    let db = Arc::new(Database::new(&config.db_url, &config.db_path).await?);
    db.create_all_tables().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(db)
}

async fn setup_bot(
    config: &Arc<Config>,
    services: Arc<Services>,
    radarr: Arc<RadarrClient>,
    sonarr: Arc<SonarrClient>,
    init_start: Instant,
) -> Result<Bot> {
    info!("Starting bot...");
    let bot = Bot::start(config.clone(), services, radarr, sonarr).await?;
    info!(
        "Bot setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(bot)
}

fn setup_server(config: &Config, notify: Arc<NotifyContext>) {
    debug!("Setting up webhook server...");
    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new()),
        notify,
    };
    let bind_addr = config.bind_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(&bind_addr, state).await {
            error!("Webhook server error: {:?}", e);
        }
    });
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "arrcord is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
