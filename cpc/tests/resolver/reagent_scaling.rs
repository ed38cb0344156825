use cpc::{CpcError, ItemRef};

use crate::helpers::{
    BOLT, BOLT_RECIPE, CLOTH, REALM, REGION, VIBRANT_CLOTH, approx, auctions_path, bolt_world,
    calculator, calculator_with_controller, professions,
};

#[tokio::test]
async fn reagents_scale_with_the_number_of_crafts() {
    let calc = calculator(bolt_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 6)
        .await
        .unwrap();

    assert!(node.craftable);
    assert_eq!(node.vendor_price, None);
    assert_eq!(node.recipes.len(), 1);

    let option = &node.recipes[0];
    assert_eq!(option.recipe_id, BOLT_RECIPE);
    assert_eq!(option.profession, "Tailoring");
    assert_eq!(option.rank, 0);
    assert!(approx(option.output.min, 3.0));

    let parts: Vec<(u32, f64)> = option.parts.iter().map(|p| (p.item_id, p.quantity)).collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].0, CLOTH);
    assert!(approx(parts[0].1, 4.0));
    assert_eq!(parts[1].0, VIBRANT_CLOTH);
    assert!(approx(parts[1].1, 6.0));
}

#[tokio::test]
async fn option_cost_sums_auction_priced_parts() {
    let calc = calculator(bolt_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 6)
        .await
        .unwrap();

    let cost = node.recipes[0].cost;
    // cloth 4 x 20, vibrant 6 x (50..60, weighted 53.33)
    assert!(approx(cost.high, 440.0));
    assert!(approx(cost.low, 380.0));
    assert!(approx(cost.average, 400.0));

    assert_eq!(node.ah_price.total_sales, 10);
    assert!(approx(node.ah_price.average, 400.0));
}

#[tokio::test]
async fn items_resolve_by_name() {
    let calc = calculator(bolt_world());
    let node = calc
        .resolve(
            REGION,
            REALM,
            &professions(&["Tailoring"]),
            &ItemRef::from("wildercloth bolt"),
            3,
        )
        .await
        .unwrap();
    assert_eq!(node.item_id, BOLT);
}

#[tokio::test]
async fn one_snapshot_prices_the_whole_tree() {
    let (calc, ctrl) = calculator_with_controller(bolt_world());
    calc.resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 3)
        .await
        .unwrap();
    assert_eq!(ctrl.call_count(&auctions_path()).await, 1);
}

#[tokio::test]
async fn unknown_realm_is_not_found() {
    let calc = calculator(bolt_world());
    let err = calc
        .resolve(REGION, "Nowhere", &professions(&["Tailoring"]), &ItemRef::from(BOLT), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CpcError::NotFound { .. }), "got {err:?}");
}
