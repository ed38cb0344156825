use cpc::{ItemRef, RunConfiguration};
use proptest::prelude::*;

use crate::helpers::{
    BOLT, CLOTH, REALM, REGION, THREAD, VIBRANT_CLOTH, approx, bolt_world, calculator,
    vendor_world,
};

proptest! {
    #![proptest_config(ProptestConfig { cases: 24, .. ProptestConfig::default() })]
    #[test]
    fn reagents_grow_linearly_with_quantity(count in 1u32..=60) {
        tokio_test::block_on(async move {
            let calc = calculator(bolt_world());
            let node = calc
                .resolve(REGION, REALM, &["Tailoring".to_string()], &ItemRef::from(BOLT), count)
                .await
                .unwrap();
            let parts = &node.recipes[0].parts;
            let crafts = f64::from(count) / 3.0;
            assert_eq!(parts[0].item_id, CLOTH);
            assert!(approx(parts[0].quantity, 2.0 * crafts));
            assert_eq!(parts[1].item_id, VIBRANT_CLOTH);
            assert!(approx(parts[1].quantity, 3.0 * crafts));
        });
    }

    #[test]
    fn netting_never_goes_negative(count in 1u32..=40, on_hand in 0u64..=60) {
        tokio_test::block_on(async move {
            let calc = calculator(vendor_world());
            let mut run = RunConfiguration::new(REGION, REALM, THREAD, count)
                .with_inventory(THREAD, on_hand);
            let tree = calc.resolve_run(&run).await.unwrap();

            let first = calc.shopping_lists(&tree, &mut run);
            let entry = &first[&0][0];
            let expected = (f64::from(count) - on_hand as f64).max(0.0);
            assert!(entry.quantity >= 0.0);
            assert!(approx(entry.quantity, expected));

            let second = calc.shopping_lists(&tree, &mut run);
            assert_eq!(first, second);
        });
    }
}
