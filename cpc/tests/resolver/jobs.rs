use cpc::{AddonData, CpcError, ItemRef, JobOutcome, JobRequest, Region};

use crate::helpers::{
    BOLT, CLOTH, GLOVES, REALM, REGION, THREAD, VIBRANT_CLOTH, approx, calculator, demo_world,
};

fn request(item: impl Into<ItemRef>, count: u32, realm: &str) -> JobRequest {
    JobRequest {
        job_id: "job-1".into(),
        item: item.into(),
        count,
        professions: vec!["Tailoring".into()],
        realm: realm.into(),
        region: REGION,
        inventory: Vec::new(),
    }
}

#[tokio::test]
async fn completed_job_carries_tree_and_lists() {
    let calc = calculator(demo_world());
    let resp = calc.run_job(&request(BOLT, 3, REALM)).await;

    assert_eq!(resp.job_id, "job-1");
    assert!(resp.is_complete());
    let JobOutcome::Complete {
        price,
        shopping_lists,
    } = resp.outcome
    else {
        panic!("job did not complete");
    };
    assert_eq!(price.item_id, BOLT);
    let list = &shopping_lists[&0];
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].item_id, CLOTH);
    assert_eq!(list[1].item_id, VIBRANT_CLOTH);
}

#[tokio::test]
async fn failed_job_reports_the_error() {
    let calc = calculator(demo_world());
    let resp = calc.run_job(&request(BOLT, 3, "Nowhere")).await;
    assert!(!resp.is_complete());

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["job_id"], "job-1");
    assert_eq!(json["status"], "failed");
    let expected = CpcError::not_found("realm Nowhere").to_string();
    assert_eq!(json["error"], expected.as_str());
}

#[tokio::test]
async fn addon_export_becomes_a_request() {
    let addon: AddonData = serde_json::from_value(serde_json::json!({
        "Inventory": [{ "Id": THREAD, "Quantity": 1 }],
        "Professions": ["Tailoring"],
        "Realm": { "Region_id": 1, "Region_name": "us", "Realm_id": 12, "Realm_name": REALM }
    }))
    .unwrap();

    let job = JobRequest::from_addon_data("job-2", &addon, GLOVES, 1).unwrap();
    assert_eq!(job.region, Region::Us);
    assert_eq!(job.realm, REALM);

    let calc = calculator(demo_world());
    let resp = calc.run_job(&job).await;
    let JobOutcome::Complete { shopping_lists, .. } = resp.outcome else {
        panic!("job did not complete");
    };
    let thread = &shopping_lists[&346][0];
    assert_eq!(thread.item_id, THREAD);
    assert!(approx(thread.quantity, 1.0));
}

#[test]
fn requests_decode_with_defaults() {
    let job: JobRequest = serde_json::from_value(serde_json::json!({
        "job_id": "j",
        "item": "Wildercloth Bolt",
        "count": 2,
        "realm": REALM,
        "region": "eu"
    }))
    .unwrap();
    assert_eq!(job.item, ItemRef::Name("Wildercloth Bolt".into()));
    assert_eq!(job.region, Region::Eu);
    assert!(job.professions.is_empty());
    assert!(job.inventory.is_empty());
}

#[tokio::test]
async fn detail_fill_isolates_failures() {
    let calc = calculator(demo_world());
    let fill = calc
        .fill_item_details(&[(BOLT, REGION), (999_999, REGION), (THREAD, REGION)])
        .await;

    assert_eq!(fill.filled.len(), 2);
    assert_eq!(fill.filled[0].item_id, BOLT);
    assert_eq!(fill.filled[0].name, "Wildercloth Bolt");
    assert!(fill.filled[0].craftable);
    assert_eq!(fill.filled[1].item_id, THREAD);
    assert!(!fill.filled[1].craftable);

    assert_eq!(fill.failed.len(), 1);
    assert_eq!(fill.failed[0].item_id, 999_999);
}
