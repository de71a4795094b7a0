use project_issues::core::config::BlockConfig;
use project_issues::IssuesBlock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BlockConfig::from_env()?;
    tracing::info!(
        project = config.project_name(),
        max_issues = config.max_issues(),
        "building issues block"
    );

    let as_json = std::env::args().skip(1).any(|arg| arg == "--json");
    let rendered = IssuesBlock::from_config(config).build().await;
    if as_json {
        println!("{}", rendered.to_json()?);
    } else {
        print!("{}", rendered.to_text());
    }
    Ok(())
}
