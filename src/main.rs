use std::net::TcpListener;
use taskboard::configuration::get_configuration;
use taskboard::startup::run;
use taskboard::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let pool = configuration.database.connection_pool().map_err(|e| {
        tracing::error!("Failed to create connection pool: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Database configuration error")
    })?;

    // Schema is created/upgraded before the first request is served
    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Database migration error",
        )
    })?;

    tracing::info!("Database schema is up to date");

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, pool, configuration)?;
    server.await
}
