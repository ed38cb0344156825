use cpc::{Calculator, ItemRef, ProfitNode};
use cpc_mock::{MockGameData, fixtures};
use std::sync::Arc;

fn print_node(node: &ProfitNode, depth: usize) {
    let pad = "  ".repeat(depth);
    println!(
        "{pad}{} x{:.2} (ah avg {:.0}, vendor {:?})",
        node.item_name, node.quantity, node.ah_price.average, node.vendor_price
    );
    for option in &node.recipes {
        println!(
            "{pad}  via {} [rank {}] cost {:.0}..{:.0}",
            option.recipe_name, option.rank, option.cost.low, option.cost.high
        );
        for part in &option.parts {
            print_node(part, depth + 2);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Serve a canned world instead of the live service.
    let api = Arc::new(MockGameData::new(fixtures::demo_world()));

    // 2. Build the calculator with the matching reference tables.
    let calc = Calculator::builder()
        .with_api(api)
        .static_sources(fixtures::demo_static_sources())
        .build()?;

    // 3. Price two pairs of gloves made by a tailor.
    let tree = calc
        .resolve(
            fixtures::REGION,
            fixtures::REALM,
            &["Tailoring".to_string()],
            &ItemRef::from(fixtures::GLOVES),
            2,
        )
        .await?;

    print_node(&tree, 0);
    Ok(())
}
