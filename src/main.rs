use keittokirja::{routes, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("environment misconfigured");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to the database");

    log::info!("listening on 0.0.0.0:{}", config.port);
    warp::serve(routes(pool, config.jwt_secret))
        .run(([0, 0, 0, 0], config.port))
        .await;
}
