#![allow(dead_code)]

use cpc::{Calculator, CalculatorBuilder, StaticSources};
use cpc_mock::fixtures;
use cpc_mock::{MockController, MockGameData, MockWorld};

pub use cpc_mock::fixtures::*;

/// Builder over `world` with the demo reference tables.
pub fn builder(world: MockWorld) -> (CalculatorBuilder, MockController) {
    builder_with(world, fixtures::demo_static_sources())
}

pub fn builder_with(
    world: MockWorld,
    statics: StaticSources,
) -> (CalculatorBuilder, MockController) {
    let (api, ctrl) = MockGameData::with_controller(world);
    let b = Calculator::builder().with_api(api).static_sources(statics);
    (b, ctrl)
}

pub fn calculator(world: MockWorld) -> Calculator {
    builder(world).0.build().unwrap()
}

pub fn calculator_with_controller(world: MockWorld) -> (Calculator, MockController) {
    let (b, ctrl) = builder(world);
    (b.build().unwrap(), ctrl)
}

pub fn professions(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

pub fn auctions_path() -> String {
    format!("/data/wow/connected-realm/{REALM_ID}/auctions")
}
