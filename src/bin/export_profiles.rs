use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tg_dolmetscher::persistence::JsonFilePersistence;
use tg_dolmetscher::store::ProfileStore;

#[derive(Clone, Copy, ValueEnum)]
enum Report {
    Translators,
    Clients,
    Stats,
}

#[derive(Parser)]
#[command(name = "export_profiles")]
#[command(about = "Print stored translators, clients or aggregate stats as JSON")]
struct Cli {
    #[arg(value_enum)]
    report: Report,

    /// Directory holding the bot's JSON files
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Only list profiles in this city (case-insensitive)
    #[arg(long)]
    city: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    // JsonFilePersistence would create a mistyped directory
    if !cli.data_dir.is_dir() {
        return Err(format!("data directory {} does not exist", cli.data_dir.display()).into());
    }
    let store = ProfileStore::open(Arc::new(JsonFilePersistence::new(&cli.data_dir)?));

    let output = match (cli.report, cli.city.as_deref()) {
        (Report::Translators, Some(city)) => {
            serde_json::to_string_pretty(&store.translators_in_city(city).await)?
        }
        (Report::Translators, None) => serde_json::to_string_pretty(&store.translators().await)?,
        (Report::Clients, Some(city)) => {
            serde_json::to_string_pretty(&store.clients_in_city(city).await)?
        }
        (Report::Clients, None) => serde_json::to_string_pretty(&store.clients().await)?,
        (Report::Stats, _) => serde_json::to_string_pretty(&store.dashboard_stats().await)?,
    };

    println!("{}", output);
    Ok(())
}
