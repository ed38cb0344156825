use cpc::{Calculator, CpcConfig, ItemRef, Region};
use cpc_blizzard::BlizzardConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Usage: 03_live_service <item> <realm> [region] [profession...]
    let mut args = std::env::args().skip(1);
    let item: ItemRef = args.next().ok_or("missing item")?.parse()?;
    let realm = args.next().ok_or("missing realm")?;
    let region: Region = args.next().as_deref().unwrap_or("us").parse()?;
    let professions: Vec<String> = args.collect();

    // Needs CLIENT_ID and CLIENT_SECRET; STATIC_DIR_ROOT and REDIS_URL are optional.
    let config = CpcConfig::from_env()?;
    let api = BlizzardConnector::builder(config.credentials.clone());
    let calc = Calculator::from_config(&config, api).await?;

    let tree = calc.resolve(region, &realm, &professions, &item, 1).await?;
    println!("{}", serde_json::to_string_pretty(&tree)?);

    calc.shutdown();
    Ok(())
}
