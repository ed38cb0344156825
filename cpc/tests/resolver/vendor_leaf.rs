use cpc::ItemRef;

use crate::helpers::{REALM, REGION, THREAD, approx, calculator, vendor_world};

#[tokio::test]
async fn vendor_item_is_a_priced_leaf() {
    let calc = calculator(vendor_world());
    let node = calc
        .resolve(REGION, REALM, &[], &ItemRef::from(THREAD), 10)
        .await
        .unwrap();

    assert_eq!(node.item_name, "Spool of Thread");
    assert!(approx(node.quantity, 10.0));
    assert_eq!(node.vendor_price, Some(1.0));
    assert!(!node.craftable);
    assert!(node.recipes.is_empty());
    assert!(node.ah_price.is_empty());
}

#[tokio::test]
async fn vendor_items_skip_the_recipe_scan() {
    let calc = calculator(vendor_world());
    let status = calc.crafting_status(REGION, THREAD, &[]).await.unwrap();
    assert!(!status.craftable);
    assert!(status.recipe_ids.is_empty());
}
