use cpc::{AddonData, Calculator, JobOutcome, JobRequest};
use cpc_mock::{MockGameData, fixtures};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // An addon export: a tailor on Hyjal holding some thread and cloth.
    let addon: AddonData = serde_json::from_str(
        r#"{
            "Inventory": [{ "Id": 1000, "Quantity": 3 }, { "Id": 2001, "Quantity": 4 }],
            "Professions": ["Tailoring"],
            "Realm": { "Region_id": 1, "Region_name": "us", "Realm_id": 12, "Realm_name": "Hyjal" }
        }"#,
    )?;

    let calc = Calculator::builder()
        .with_api(Arc::new(MockGameData::new(fixtures::demo_world())))
        .static_sources(fixtures::demo_static_sources())
        .build()?;

    let job = JobRequest::from_addon_data("demo", &addon, fixtures::GLOVES, 3)?;
    let response = calc.run_job(&job).await;

    match response.outcome {
        JobOutcome::Complete { shopping_lists, .. } => {
            for (rank, entries) in &shopping_lists {
                println!("rank {rank}:");
                for e in entries {
                    println!(
                        "  {:>6.2} x {} (vendor {:?}, ah avg {:?})",
                        e.quantity,
                        e.name,
                        e.cost.vendor,
                        e.cost.ah.map(|p| p.average)
                    );
                }
            }
        }
        JobOutcome::Failed { error } => println!("job failed: {error}"),
    }
    Ok(())
}
