use cpc::ItemRef;

use crate::helpers::{
    GLOVES, GLOVES_LEVEL, GLOVES_RECIPE, GLOVES_RECIPE_HIGH, REALM, REGION,
    approx, calculator, demo_world, professions,
};

#[tokio::test]
async fn each_recipe_gets_its_rank_and_price() {
    let calc = calculator(demo_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(GLOVES), 1)
        .await
        .unwrap();

    assert_eq!(node.base_level, GLOVES_LEVEL);
    assert_eq!(node.ranks(), vec![346, 359]);

    let low = &node.recipes[0];
    assert_eq!(low.recipe_id, GLOVES_RECIPE);
    assert_eq!(low.rank, 346);
    let price = low.rank_price.unwrap();
    assert_eq!(price.total_sales, 3);
    assert!(approx(price.average, 10_000.0));

    let high = &node.recipes[1];
    assert_eq!(high.recipe_id, GLOVES_RECIPE_HIGH);
    assert_eq!(high.rank, 359);
    let price = high.rank_price.unwrap();
    assert_eq!(price.total_sales, 1);
    assert!(approx(price.average, 15_000.0));
}

#[tokio::test]
async fn unfiltered_price_covers_every_listing() {
    let calc = calculator(demo_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(GLOVES), 1)
        .await
        .unwrap();
    assert_eq!(node.ah_price.total_sales, 6);
    assert!(approx(node.ah_price.high, 15_000.0));
    assert!(approx(node.ah_price.low, 8_000.0));
    // crafted items carry prices per recipe, not per bonus
    assert!(node.bonus_prices.is_empty());
}

#[tokio::test]
async fn costs_roll_up_through_crafted_reagents() {
    let calc = calculator(demo_world());
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(GLOVES), 1)
        .await
        .unwrap();

    let thread_option = node.recipes[0].cost;
    assert!(approx(thread_option.high, 222.0));
    assert!(approx(thread_option.low, 192.0));
    assert!(approx(thread_option.average, 202.0));

    let spark_option = node.recipes[1].cost;
    assert!(approx(spark_option.high, 2_720.0));
    assert!(approx(spark_option.low, 2_690.0));
    assert!(approx(spark_option.average, 2_700.0));
}
