use dotenvy::dotenv;

use videomoji::bot;
use videomoji::config::settings::BotConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let config = BotConfig::new().expect("TELEGRAM_BOT_TOKEN is not set");

    bot::run(config).await;
}
