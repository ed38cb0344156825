use cpc::{CpcError, ItemRef};

use crate::helpers::{
    ALCHEMY, ALCHEMY_TIER, BLESSED_ORE, REALM, REFINED_ORE, REGION, approx, calculator,
    cyclic_world, professions,
};

#[tokio::test]
async fn resolving_into_a_conversion_pair_fails() {
    let calc = calculator(cyclic_world());
    let alchemy = professions(&["Alchemy"]);

    let err = calc
        .resolve(REGION, REALM, &alchemy, &ItemRef::from(BLESSED_ORE), 1)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CpcError::CyclicRecipe {
            item: REFINED_ORE,
            partner: BLESSED_ORE,
        }
    );

    let err = calc
        .resolve(REGION, REALM, &alchemy, &ItemRef::from(REFINED_ORE), 1)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CpcError::CyclicRecipe {
            item: BLESSED_ORE,
            partner: REFINED_ORE,
        }
    );
}

#[tokio::test]
async fn cyclic_table_is_filled_both_ways() {
    let calc = calculator(cyclic_world());
    let table = calc
        .cyclic_links(REGION, &professions(&["Alchemy"]))
        .await
        .unwrap();

    let blessed = table.edges(BLESSED_ORE);
    assert_eq!(blessed.len(), 1);
    assert_eq!(blessed[0].partner, REFINED_ORE);
    assert!(approx(blessed[0].takes, 1.0));
    assert!(approx(blessed[0].makes, 1.0));

    let refined = table.edges(REFINED_ORE);
    assert_eq!(refined.len(), 1);
    assert_eq!(refined[0].partner, BLESSED_ORE);
}

#[tokio::test]
async fn other_professions_see_no_cycle() {
    let calc = calculator(cyclic_world());
    let table = calc
        .cyclic_links(REGION, &professions(&["Tailoring"]))
        .await
        .unwrap();
    assert!(table.is_empty());

    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BLESSED_ORE), 2)
        .await
        .unwrap();
    assert!(!node.craftable);
    assert_eq!(node.ah_price.total_sales, 20);
}

#[tokio::test]
async fn tier_links_are_recorded_once() {
    let calc = calculator(cyclic_world());
    let links = calc
        .tier_cyclic_links(REGION, ALCHEMY, ALCHEMY_TIER)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
    assert!(links[0].first.recipe_id < links[0].second.recipe_id);
}
