use cpc::{CpcError, ItemRef};

use crate::helpers::{
    BOLT, BOLT_RECIPE, REALM, REGION, TAILORING, builder, calculator, demo_world, professions,
};

#[tokio::test]
async fn empty_list_means_every_profession() {
    let calc = calculator(demo_world());
    let all = calc.crafting_status(REGION, BOLT, &[]).await.unwrap();
    let tailoring = calc
        .crafting_status(REGION, BOLT, &professions(&["Tailoring"]))
        .await
        .unwrap();

    assert!(all.craftable);
    assert_eq!(all.recipe_ids, vec![BOLT_RECIPE]);
    assert_eq!(all, tailoring);
    assert_eq!(all.recipes[0].profession_id, TAILORING);
}

#[tokio::test]
async fn profession_names_ignore_case() {
    let calc = calculator(demo_world());
    let status = calc
        .crafting_status(REGION, BOLT, &professions(&["TAILORING"]))
        .await
        .unwrap();
    assert!(status.craftable);
}

#[tokio::test]
async fn unknown_profession_is_invalid() {
    let calc = calculator(demo_world());
    let err = calc
        .crafting_status(REGION, BOLT, &professions(&["Mining"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CpcError::InvalidArg(_)), "got {err:?}");
}

#[tokio::test]
async fn several_failing_professions_are_reported_together() {
    let calc = calculator(demo_world());
    let err = calc
        .crafting_status(REGION, BOLT, &professions(&["Mining", "Herbalism"]))
        .await
        .unwrap_err();
    match err {
        CpcError::Multiple(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().all(|e| matches!(e, CpcError::InvalidArg(_))));
        }
        other => panic!("expected Multiple, got {other:?}"),
    }
}

#[tokio::test]
async fn tier_filter_limits_the_scan() {
    let (b, _) = builder(demo_world());
    let calc = b.tier_filter("Shadowlands").build().unwrap();
    let node = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 3)
        .await
        .unwrap();
    assert!(!node.craftable);

    let (b, _) = builder(demo_world());
    let calc = b.tier_filter("Dragon Isles").build().unwrap();
    let status = calc
        .crafting_status(REGION, BOLT, &professions(&["Tailoring"]))
        .await
        .unwrap();
    assert!(status.craftable);
}
