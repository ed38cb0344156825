use cpc::{ItemRef, RunConfiguration};

use crate::helpers::{
    BOLT, BOLT_RECIPE, CLOTH, GLOVES, REALM, REGION, SPARK, THREAD, VIBRANT_CLOTH, approx,
    builder_with, calculator, demo_world, professions, static_sources_excluding, vendor_world,
};

fn summary(entries: &[cpc::ShoppingListEntry]) -> Vec<(u32, f64)> {
    entries.iter().map(|e| (e.item_id, e.quantity)).collect()
}

fn same(actual: &[(u32, f64)], expected: &[(u32, f64)]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.0 == e.0 && approx(a.1, e.1))
}

#[tokio::test]
async fn one_list_per_rank() {
    let calc = calculator(demo_world());
    let mut run = RunConfiguration::new(REGION, REALM, GLOVES, 1).with_professions(["Tailoring"]);
    let tree = calc.resolve_run(&run).await.unwrap();
    let lists = calc.shopping_lists(&tree, &mut run);

    assert_eq!(lists.keys().copied().collect::<Vec<_>>(), vec![346, 359]);
    let low = summary(&lists[&346]);
    assert!(
        same(&low, &[(THREAD, 2.0), (CLOTH, 2.0), (VIBRANT_CLOTH, 3.0)]),
        "{low:?}"
    );
    let high = summary(&lists[&359]);
    assert!(
        same(&high, &[(CLOTH, 2.0), (VIBRANT_CLOTH, 3.0), (SPARK, 1.0)]),
        "{high:?}"
    );

    let thread = &lists[&346][0];
    assert_eq!(thread.cost.vendor, Some(2.0));
    assert!(thread.cost.ah.is_none());
    let spark = &lists[&359][2];
    assert!(approx(spark.cost.ah.unwrap().average, 2_500.0));
}

#[tokio::test]
async fn inventory_is_netted_and_rebuilds_are_stable() {
    let calc = calculator(vendor_world());
    let mut run = RunConfiguration::new(REGION, REALM, THREAD, 8).with_inventory(THREAD, 5);
    let tree = calc.resolve_run(&run).await.unwrap();

    let lists = calc.shopping_lists(&tree, &mut run);
    assert!(same(&summary(&lists[&0]), &[(THREAD, 3.0)]));
    assert_eq!(lists[&0][0].cost.vendor, Some(3.0));

    let again = calc.shopping_lists(&tree, &mut run);
    assert_eq!(lists, again);
}

#[tokio::test]
async fn fully_stocked_items_stay_listed_at_zero() {
    let calc = calculator(vendor_world());
    let mut run = RunConfiguration::new(REGION, REALM, THREAD, 4).with_inventory(THREAD, 10);
    let tree = calc.resolve_run(&run).await.unwrap();
    let lists = calc.shopping_lists(&tree, &mut run);
    assert!(same(&summary(&lists[&0]), &[(THREAD, 0.0)]));
}

#[tokio::test]
async fn excluded_recipes_are_bought_as_is() {
    let (b, _) = builder_with(demo_world(), static_sources_excluding(&[BOLT_RECIPE]));
    let calc = b.build().unwrap();

    let tailoring = professions(&["Tailoring"]);
    let tree = calc
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(BOLT), 3)
        .await
        .unwrap();
    let mut run = RunConfiguration::new(REGION, REALM, BOLT, 3).with_professions(["Tailoring"]);
    let lists = calc.shopping_lists(&tree, &mut run);
    assert!(same(&summary(&lists[&0]), &[(BOLT, 3.0)]));

    let gloves = calc
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(GLOVES), 1)
        .await
        .unwrap();
    let lists = calc.shopping_lists(&gloves, &mut run);
    assert!(same(&summary(&lists[&346]), &[(THREAD, 2.0), (BOLT, 3.0)]));
}
