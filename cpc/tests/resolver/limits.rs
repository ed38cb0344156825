use cpc::{Calculator, CpcError, ItemRef};

use crate::helpers::{BOLT, GLOVES, REALM, REGION, builder, demo_world, professions};

#[tokio::test]
async fn deep_trees_are_rejected() {
    let (b, _) = builder(demo_world());
    let calc = b.max_depth(1).build().unwrap();
    let err = calc
        .resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 3)
        .await
        .unwrap_err();
    assert_eq!(err, CpcError::DepthExceeded { depth: 1 });

    let (b, _) = builder(demo_world());
    let calc = b.max_depth(2).build().unwrap();
    assert!(
        calc.resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(BOLT), 3)
            .await
            .is_ok()
    );
    assert!(
        calc.resolve(REGION, REALM, &professions(&["Tailoring"]), &ItemRef::from(GLOVES), 1)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn narrow_fan_out_gives_the_same_tree() {
    let (b, _) = builder(demo_world());
    let serial = b.fan_out(1).build().unwrap();
    let (b, _) = builder(demo_world());
    let wide = b.fan_out(8).build().unwrap();

    let tailoring = professions(&["Tailoring"]);
    let a = serial
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(GLOVES), 2)
        .await
        .unwrap();
    let b = wide
        .resolve(REGION, REALM, &tailoring, &ItemRef::from(GLOVES), 2)
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn builder_requires_a_connector() {
    let err = Calculator::builder().build().unwrap_err();
    assert!(matches!(err, CpcError::InvalidArg(_)));
}
