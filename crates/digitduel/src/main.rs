use digitduel::DigitduelServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr =
        std::env::var("DIGITDUEL_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = DigitduelServer::builder().bind(&addr).build().await?;
    tracing::info!(%addr, "starting digitduel server");
    server.run().await?;
    Ok(())
}
