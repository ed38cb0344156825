use cpc::ItemRef;

use crate::helpers::{
    BOLT, BOLT_RECIPE, REALM, REGION, TAILORING, TAILORING_TIER, auctions_path, bolt_world,
    calculator_with_controller, professions,
};

#[tokio::test]
async fn second_resolution_only_fetches_auctions() {
    let (calc, ctrl) = calculator_with_controller(bolt_world());
    let tailoring = professions(&["Tailoring"]);

    let first = calc
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(BOLT), 3)
        .await
        .unwrap();
    assert_eq!(ctrl.call_count(&format!("/data/wow/recipe/{BOLT_RECIPE}")).await, 1);
    assert_eq!(
        ctrl.call_count(&format!("/data/wow/profession/{TAILORING}/skill-tier/{TAILORING_TIER}"))
            .await,
        1
    );

    ctrl.reset_calls().await;
    let second = calc
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(BOLT), 3)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(ctrl.total_calls().await, 1);
    assert_eq!(ctrl.call_count(&auctions_path()).await, 1);
}

#[tokio::test]
async fn crafting_status_is_memoized_per_profession_set() {
    let (calc, ctrl) = calculator_with_controller(bolt_world());
    let tailoring = professions(&["Tailoring"]);

    calc.crafting_status(REGION, BOLT, &tailoring).await.unwrap();
    ctrl.reset_calls().await;
    calc.crafting_status(REGION, BOLT, &tailoring).await.unwrap();
    assert_eq!(ctrl.total_calls().await, 0);
}
