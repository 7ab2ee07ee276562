use clap::Parser;
use config::Config;
use dotenvy::dotenv;

use ipsearch::cli::Cli;
use ipsearch::models::config::ClientConfig;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let settings = Config::builder()
        // Add `./config/default.yaml` when running from a checkout
        .add_source(config::File::with_name("config/default").required(false))
        // Add profile-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", cli.profile)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = ipsearch::run(client_config, cli.command) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
