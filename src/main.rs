use std::net::TcpListener;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use padelclub_backend::config::settings::{get_config, get_jwt_settings};
use padelclub_backend::run;
use padelclub_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "padelclub-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(config.database.connection_string().expose_secret())
        .expect("Failed to create Postgres connection pool");

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Starting server at {}", address);

    run(
        listener,
        connection_pool,
        jwt_settings,
        config.padel.clone(),
    )?
    .await
}
