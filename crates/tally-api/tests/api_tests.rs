use application::TallyReportService;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use domain::facts::NormalizerConfig;
use domain::{
    Calendar, FactNormalizer, FixedClock, Granularity, ServiceLevel, TallySnapshot, Uom,
};
use infrastructure::{FileRhelProductList, InMemoryTallySnapshotRepository, parse_tag_profile};
use serde_json::{Value, json};
use std::sync::Arc;
use tally_api::api::{ACCOUNT_HEADER, create_router};
use tally_api::state::AppState;
use tower::ServiceExt;

const PROFILE: &str = r#"
tagMappings:
  - { value: "69", valueType: engId, tags: [RHEL] }
  - { value: "290", valueType: engId, tags: [OpenShift Container Platform] }
tagMetrics:
  - { tag: OpenShift-metrics, uom: Cores, metricId: redhat.com:openshift_container_platform:cpu_hour }
tagMetaData:
  - { tags: [RHEL], finestGranularity: DAILY }
  - { tags: [OpenShift-metrics], serviceType: OpenShift Cluster, finestGranularity: HOURLY }
"#;

fn app() -> axum::Router {
    let profile = Arc::new(parse_tag_profile(PROFILE).unwrap());
    let snapshots = vec![
        TallySnapshot::new(
            "account123",
            "RHEL",
            Granularity::Daily,
            Utc.with_ymd_and_hms(2019, 5, 2, 0, 0, 0).unwrap(),
        )
        .with_service_level(ServiceLevel::Premium)
        .with_measurement(Uom::Cores, 8.0),
        TallySnapshot::new(
            "account123",
            "RHEL",
            Granularity::Daily,
            Utc.with_ymd_and_hms(2019, 5, 3, 0, 0, 0).unwrap(),
        )
        .with_measurement(Uom::Cores, 4.0),
    ];
    let repository = Arc::new(InMemoryTallySnapshotRepository::with_snapshots(snapshots));
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2019, 5, 24, 12, 30, 0).unwrap(),
    ));

    let state = AppState {
        report_service: TallyReportService::new(repository, Calendar::default())
            .with_tag_profile(profile.clone()),
        tag_profile: profile.clone(),
        normalizer: FactNormalizer::new(
            NormalizerConfig::default(),
            Arc::new(FileRhelProductList::from_ids(["69"])),
            clock,
        )
        .with_tag_profile(profile),
    };
    create_router(Arc::new(state))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn tally_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/v1/tally/products/RHEL?{}", query))
        .header(ACCOUNT_HEADER, "account123")
        .body(Body::empty())
        .unwrap()
}

const RANGE: &str = "granularity=daily&beginning=2019-05-01T00:00:00Z&ending=2019-05-04T00:00:00Z";

#[tokio::test]
async fn test_health() {
    let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unpaged_report_is_filled() {
    let (status, body) = send(tally_request(RANGE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 4);
    assert_eq!(body["meta"]["product"], "RHEL");
    assert_eq!(body["meta"]["granularity"], "DAILY");
    assert!(body["meta"].get("service_level").is_none());
    assert!(body.get("links").is_none());

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["has_data"], false);
    assert_eq!(data[1]["has_data"], true);
    assert_eq!(data[1]["measurements"]["Cores"], 8.0);
    assert_eq!(data[2]["measurements"]["Cores"], 4.0);
    assert_eq!(data[3]["has_data"], false);
}

#[tokio::test]
async fn test_sla_filter() {
    let (status, body) = send(tally_request(&format!("{}&sla=Premium", RANGE))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["service_level"], "Premium");
    let with_data: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["has_data"] == true)
        .collect();
    assert_eq!(with_data.len(), 1);
}

#[tokio::test]
async fn test_paged_report_has_links_and_no_fill() {
    let (status, body) = send(tally_request(&format!("{}&offset=0&limit=1", RANGE))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["has_data"], true);

    let links = &body["links"];
    assert!(links["first"].as_str().unwrap().ends_with("offset=0&limit=1"));
    assert!(links["last"].as_str().unwrap().ends_with("offset=1&limit=1"));
    assert!(links["next"].as_str().unwrap().ends_with("offset=1&limit=1"));
    assert!(links.get("previous").is_none());
}

#[tokio::test]
async fn test_invalid_sla_is_bad_request() {
    let (status, body) = send(tally_request(&format!("{}&sla=badSla", RANGE))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("badSla"));
}

#[tokio::test]
async fn test_misaligned_offset_is_bad_request() {
    let (status, _) = send(tally_request(&format!("{}&offset=3&limit=2", RANGE))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_granularity_finer_than_registered_is_bad_request() {
    let query = "granularity=hourly&beginning=2019-05-01T00:00:00Z&ending=2019-05-01T03:00:00Z";
    let (status, _) = send(tally_request(query)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_account_header_is_unauthorized() {
    let request = Request::get(format!("/api/v1/tally/products/RHEL?{}", RANGE))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains(ACCOUNT_HEADER));
}

#[tokio::test]
async fn test_tag_metrics() {
    let request = Request::get("/api/v1/registry/tags/OpenShift-metrics/metrics")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uoms"], json!(["Cores"]));
    assert_eq!(
        body["metrics"][0]["metricId"],
        "redhat.com:openshift_container_platform:cpu_hour"
    );
    assert_eq!(body["metadata"]["serviceType"], "OpenShift Cluster");
}

#[tokio::test]
async fn test_unknown_tag_metrics_is_not_found() {
    let request = Request::get("/api/v1/registry/tags/NOT_FOUND/metrics")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_normalize_facts() {
    let request = Request::post("/api/v1/facts/normalize")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "account": "account123",
                "org_id": "org123",
                "system_name": "host1",
                "cores": "4",
                "products": "69, 290",
                "sync_timestamp": "2019-05-24T08:00:00Z"
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!(["OpenShift Container Platform", "RHEL"]));
    assert_eq!(body["cores"], 4);
    assert_eq!(body["sockets"], 0);
}

#[tokio::test]
async fn test_normalize_stale_host_is_excluded() {
    let request = Request::post("/api/v1/facts/normalize")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "account": "account123",
                "org_id": "org123",
                "system_name": "host1",
                "cores": "4",
                "products": "69",
                "sync_timestamp": "2019-05-01T08:00:00Z"
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["cores"], Value::Null);
}
