use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use tg_dolmetscher::bot::TelegramBot;
use tg_dolmetscher::config::BotConfig;
use tg_dolmetscher::persistence::JsonFilePersistence;
use tg_dolmetscher::router::Router;
use tg_dolmetscher::store::ProfileStore;

#[derive(Parser)]
#[command(name = "tg-dolmetscher")]
#[command(about = "A Telegram bot that registers translators and clients and moderates their group")]
struct Args {
    /// Directory holding users.json, translators.json and clients.json (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        // only warn if .env file exists but failed to load
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut config = BotConfig::from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    info!(
        "Using data directory {} with {} admin(s)",
        config.data_dir.display(),
        config.admin_user_ids.len()
    );

    let persistence = JsonFilePersistence::new(&config.data_dir)?;
    let store = Arc::new(ProfileStore::open(Arc::new(persistence)));

    let config = Arc::new(config);
    let router = Arc::new(Router::new(config.clone(), store));

    info!("Starting bot...");

    let bot = TelegramBot::new(config, router);
    bot.run().await;

    Ok(())
}
