use spotify_insights::{config::ConfigBuilder, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ConfigBuilder::new().build()?;
    server::serve(config).await?;

    Ok(())
}
