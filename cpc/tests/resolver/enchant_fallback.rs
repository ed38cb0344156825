use cpc::ItemRef;

use crate::helpers::{
    DUST, REALM, REGION, RING_ENCHANT, RING_ENCHANT_RECIPE, approx, calculator, enchant_world,
    professions,
};

#[tokio::test]
async fn enchant_is_found_through_its_scroll_name() {
    let calc = calculator(enchant_world());
    let status = calc
        .crafting_status(REGION, RING_ENCHANT, &professions(&["Enchanting"]))
        .await
        .unwrap();
    assert!(status.craftable);
    assert_eq!(status.recipe_ids, vec![RING_ENCHANT_RECIPE]);
    assert_eq!(status.recipes[0].profession, "Enchanting");
}

#[tokio::test]
async fn enchant_reagents_are_resolved() {
    let calc = calculator(enchant_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["enchanting"]), &ItemRef::from(RING_ENCHANT), 2)
        .await
        .unwrap();

    let parts = &node.recipes[0].parts;
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].item_id, DUST);
    assert!(approx(parts[0].quantity, 6.0));
    assert!(approx(node.recipes[0].cost.average, 90.0));
}

#[tokio::test]
async fn enchant_needs_an_enchanting_tier() {
    let calc = calculator(enchant_world());
    let status = calc
        .crafting_status(REGION, RING_ENCHANT, &professions(&["Tailoring"]))
        .await
        .unwrap();
    assert!(!status.craftable);
}
