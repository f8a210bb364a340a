use std::sync::Arc;

use better_rest::{
    config::AppConfig,
    server::{self, AppState},
    BedtimeEstimator, LinearSleepModel, SleepModel, UnavailableModel,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("better_rest=info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;

    // A missing or broken artifact keeps the service up; every estimate
    // then answers with the fallback text.
    let model: Arc<dyn SleepModel> = match LinearSleepModel::load(&cfg.model_path) {
        Ok(m) => {
            tracing::info!("loaded model {}; feat_list: {:?}", cfg.model_path, m.feat_list());
            Arc::new(m)
        }
        Err(e) => {
            tracing::warn!("model unavailable: {:#}", e);
            Arc::new(UnavailableModel::new(format!("{:#}", e)))
        }
    };

    let estimator = BedtimeEstimator::from_shared(model).with_clock(cfg.clock);
    let app = server::router(AppState::new(estimator));

    let addr = cfg.bind_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
