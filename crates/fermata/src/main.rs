use std::sync::Arc;

use fermata_core::{config::Config, provider::HttpProvider};

#[tokio::main]
async fn main() -> Result<(), fermata_core::Error> {
    fermata_core::logging::init("fermata")?;

    let cfg = Arc::new(Config::load()?);
    let token = cfg.read_token()?;
    let provider = Arc::new(HttpProvider::new(&cfg.backend)?);

    fermata_telegram::router::run_polling(cfg, token, provider)
        .await
        .map_err(|e| match e.downcast::<fermata_core::Error>() {
            Ok(err) => err,
            Err(e) => fermata_core::Error::External(format!("telegram bot failed: {e}")),
        })?;

    tracing::info!("fermata stopped");
    Ok(())
}
