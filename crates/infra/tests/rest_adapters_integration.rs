//! Integration tests for the REST adapters, driven through a data source
//! against a mock central server.

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use evdash_core::{
    AuthSession, Collaborators, DataSource, DetailProvider, Navigator, Notifier, RendererRegistry,
    TableDefinition, TableDefinitionBuilder, VariantStore,
};
use evdash_domain::{
    CentralServerConfig, ColumnDef, FetchError, FilterDef, FilterValue, KeyValue, Session, TableDef, TableRecord,
    UserRole, Variant,
};
use evdash_infra::{
    ApiClient, ApiClientConfig, RestDetailProvider, RestListEndpoint, RestVariantStore,
    SessionTokenProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChargingStation {
    id: String,
    site_area_name: String,
}

impl TableRecord for ChargingStation {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Default)]
struct Ui {
    errors: Mutex<Vec<String>>,
    routes: Mutex<Vec<String>>,
    connection_lost: AtomicUsize,
    signed_out: AtomicBool,
}

impl Notifier for Ui {
    fn show_error(&self, message_key: &str) {
        self.errors.lock().unwrap().push(message_key.to_string());
    }

    fn show_connection_lost(&self) {
        self.connection_lost.fetch_add(1, Ordering::SeqCst);
    }
}

impl Navigator for Ui {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[async_trait]
impl AuthSession for Ui {
    fn is_authenticated(&self) -> bool {
        !self.signed_out.load(Ordering::SeqCst)
    }

    async fn logout(&self) {
        self.signed_out.store(true, Ordering::SeqCst);
    }
}

fn api_client(base_url: String) -> Arc<ApiClient> {
    let config = ApiClientConfig { base_url, timeout: Duration::from_secs(5), max_attempts: 1 };
    Arc::new(ApiClient::new(config, Arc::new(SessionTokenProvider::new("jwt"))).unwrap())
}

fn definition() -> Arc<TableDefinition> {
    let definition = TableDefinitionBuilder::new(TableDef::default().with_row_details())
        .column(ColumnDef::new("id", "chargers.id").sorted())
        .column(ColumnDef::new("siteAreaName", "chargers.site_area"))
        .filter(FilterDef::dropdown(
            "status",
            "Status",
            "chargers.status",
            vec![KeyValue::new("all", "general.all"), KeyValue::new("Faulted", "faulted")],
        ))
        .static_filter("WithSite", "true")
        .page_size(25)
        .build(&RendererRegistry::new())
        .unwrap();
    Arc::new(definition)
}

fn source(client: &Arc<ApiClient>, ui: &Arc<Ui>) -> DataSource<ChargingStation> {
    let endpoint =
        Arc::new(RestListEndpoint::<ChargingStation>::new(client.clone(), "chargingstations"));
    let collaborators = Collaborators::new(ui.clone(), ui.clone(), ui.clone());
    DataSource::<ChargingStation>::builder(definition(), endpoint, collaborators)
        .with_details(Arc::new(RestDetailProvider::new(client.clone(), "chargingstations")))
        .build()
}

#[tokio::test]
async fn list_endpoint_sends_the_query_and_decodes_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chargingstations"))
        .and(header("authorization", "Bearer jwt"))
        .and(query_param("Status", "Faulted"))
        .and(query_param("WithSite", "true"))
        .and(query_param("Skip", "0"))
        .and(query_param("Limit", "25"))
        .and(query_param("SortField", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 41,
            "result": [
                {"id": "CS-01", "siteAreaName": "Depot"},
                {"id": "CS-02", "siteAreaName": "Depot"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ui = Arc::new(Ui::default());
    let source = source(&api_client(server.uri()), &ui);
    source.apply_filter("status", FilterValue::Key("Faulted".into())).unwrap();

    let (rows, count) = source.load().await.unwrap();

    assert_eq!(count, 41);
    assert_eq!(rows[1].record_id(), "CS-02");
    assert_eq!(source.rows()[0].site_area_name, "Depot");
    assert!(ui.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn configured_client_sends_one_request_per_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chargingstations"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let central = CentralServerConfig { base_url: server.uri(), ..CentralServerConfig::default() };
    let client = Arc::new(
        ApiClient::new(ApiClientConfig::from(&central), Arc::new(SessionTokenProvider::new("jwt")))
            .unwrap(),
    );
    let ui = Arc::new(Ui::default());
    let source = source(&client, &ui);

    let err = source.load().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(server.received_requests().await.map(|requests| requests.len()), Some(1));
    assert_eq!(*ui.errors.lock().unwrap(), ["general.error_backend"]);
}

#[tokio::test]
async fn unauthorized_status_sends_the_user_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let ui = Arc::new(Ui::default());
    let source = source(&api_client(server.uri()), &ui);

    let err = source.load().await.unwrap_err();

    assert!(matches!(err, FetchError::Unauthorized(_)));
    assert_eq!(*ui.routes.lock().unwrap(), ["/auth/login"]);
    assert!(source.rows().is_empty());
}

#[tokio::test]
async fn application_refusal_shows_not_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(553))
        .expect(1)
        .mount(&server)
        .await;

    let ui = Arc::new(Ui::default());
    let source = source(&api_client(server.uri()), &ui);

    let err = source.load().await.unwrap_err();

    assert_eq!(err.status(), Some(553));
    assert_eq!(*ui.errors.lock().unwrap(), ["general.not_authorized"]);
}

#[tokio::test]
async fn unreachable_server_logs_the_user_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ui = Arc::new(Ui::default());
    let source = source(&api_client(format!("http://{addr}")), &ui);

    let err = source.load().await.unwrap_err();

    assert_eq!(err.status(), Some(0));
    assert_eq!(ui.connection_lost.load(Ordering::SeqCst), 1);
    assert!(!ui.is_authenticated());
    assert_eq!(*ui.routes.lock().unwrap(), ["/auth/login"]);
}

#[tokio::test]
async fn details_are_fetched_by_record_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chargingstations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "result": [{"id": "CS-01", "siteAreaName": "Depot"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chargingstations/CS-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connectors": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let ui = Arc::new(Ui::default());
    let source = source(&api_client(server.uri()), &ui);
    source.load().await.unwrap();

    assert!(source.toggle_row_details(0).await.unwrap());
    assert!(!source.toggle_row_details(0).await.unwrap());
    assert!(source.toggle_row_details(0).await.unwrap());

    assert_eq!(source.snapshot().rows[0].details, Some(json!({"connectors": 2})));
}

#[tokio::test]
async fn detail_provider_maps_missing_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let details = RestDetailProvider::new(api_client(server.uri()), "chargingstations/");
    let err = details.fetch_details("CS-99").await.unwrap_err();

    assert!(matches!(err, FetchError::Server { status: 404, .. }));
}

#[tokio::test]
async fn variant_store_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variants"))
        .and(query_param("ViewID", "chargers"))
        .and(query_param("UserID", "u-1"))
        .and(query_param("WithGlobal", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "result": [{"id": "v1", "name": "Everyone", "viewID": "chargers", "userID": ""}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/variants"))
        .and(body_partial_json(json!({"name": "Mine", "viewID": "chargers", "userID": "u-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v2", "name": "Mine", "viewID": "chargers", "userID": "u-1", "filters": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/variants/v2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestVariantStore::new(api_client(server.uri()));

    let listed = store.list("chargers", "u-1", true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Everyone");
    assert!(listed[0].user_id.is_empty());

    let created = store.create(&Variant::new("Mine", "chargers", "u-1")).await.unwrap();
    assert_eq!(created.id, "v2");

    store.delete(&created.id).await.unwrap();
}

#[tokio::test]
async fn data_source_saves_variants_through_the_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/variants"))
        .and(body_partial_json(json!({
            "name": "Faulted",
            "filters": [{"filterID": "status", "filterContent": {"kind": "key", "value": "Faulted"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v9", "name": "Faulted", "viewID": "chargers", "userID": "u-1",
            "filters": [{"filterID": "status", "filterContent": {"kind": "key", "value": "Faulted"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(server.uri());
    let ui = Arc::new(Ui::default());
    let endpoint =
        Arc::new(RestListEndpoint::<ChargingStation>::new(client.clone(), "chargingstations"));
    let definition = TableDefinitionBuilder::new(TableDef::default().with_view_id("chargers"))
        .column(ColumnDef::new("id", "chargers.id"))
        .filter(FilterDef::dropdown(
            "status",
            "Status",
            "chargers.status",
            vec![KeyValue::new("Faulted", "faulted")],
        ))
        .build(&RendererRegistry::new())
        .unwrap();
    let source = DataSource::<ChargingStation>::builder(
        Arc::new(definition),
        endpoint,
        Collaborators::new(ui.clone(), ui.clone(), ui.clone()),
    )
    .with_variant_store(Arc::new(RestVariantStore::new(client)))
    .with_session(Session::new("u-1", UserRole::Admin))
    .build();

    source.apply_filter("status", FilterValue::Key("Faulted".into())).unwrap();
    let saved = source.save_variant("Faulted").await.unwrap();

    assert_eq!(saved.id, "v9");
    assert_eq!(source.active_variant(), Some("v9".to_string()));
}
