mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{details, engine, stubs, FakeProvider, FakeStore, RecordingSender, VERIFY_TOKEN};
use foodbot::engine::LOCATION_PROMPT;
use foodbot::entities::{OutboundMessage, Place, Source};
use foodbot::server::router;

async fn call(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn deliver(app: Router, message: Value) -> (StatusCode, String) {
    let body = json!({
        "object": "page",
        "entry": [{
            "id": "page-1",
            "time": 1458692752478u64,
            "messaging": [{
                "sender": { "id": "user-1" },
                "recipient": { "id": "page-1" },
                "timestamp": 1458692752478u64,
                "message": message,
            }],
        }],
    });

    call(app, Method::POST, "/messenger", Body::from(body.to_string())).await
}

fn shared_location(mid: &str) -> Value {
    json!({
        "mid": mid,
        "attachments": [{
            "type": "location",
            "payload": { "coordinates": { "lat": 37.483872693672, "long": -122.14900441942 } },
        }],
    })
}

fn card_title(message: &OutboundMessage) -> Option<&str> {
    match message {
        OutboundMessage::LocationCard { title, .. } => Some(title.as_str()),
        _ => None,
    }
}

#[tokio::test]
async fn verification_echoes_the_challenge() {
    let app = router(
        engine(FakeStore::with(vec![]), Arc::default(), RecordingSender::new()),
        VERIFY_TOKEN,
    );

    let (status, body) = call(
        app,
        Method::GET,
        "/messenger?hub.mode=subscribe&hub.verify_token=hunter2&hub.challenge=1158201444",
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1158201444");
}

#[tokio::test]
async fn verification_rejects_a_wrong_token() {
    let app = router(
        engine(FakeStore::with(vec![]), Arc::default(), RecordingSender::new()),
        VERIFY_TOKEN,
    );

    let (status, body) = call(
        app,
        Method::GET,
        "/messenger?hub.mode=subscribe&hub.verify_token=guess&hub.challenge=1158201444",
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!body.contains("1158201444"));
    assert!(!body.contains(VERIFY_TOKEN));
}

#[tokio::test]
async fn empty_verify_token_is_treated_as_a_delivery() {
    let sender = RecordingSender::new();
    let app = router(
        engine(FakeStore::with(vec![]), Arc::default(), sender.clone()),
        VERIFY_TOKEN,
    );
    let body = json!({
        "object": "page",
        "entry": [{
            "messaging": [{
                "sender": { "id": "user-1" },
                "message": { "mid": "mid.1", "text": "hungry" },
            }],
        }],
    });

    let (status, body) = call(
        app,
        Method::POST,
        "/messenger?hub.verify_token=",
        Body::from(body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "EVENT_RECEIVED");
    assert_eq!(sender.messages(), vec![OutboundMessage::text(LOCATION_PROMPT)]);
}

#[tokio::test]
async fn no_location_prompts_once() {
    let store = FakeStore::with(stubs(&["c1"]));
    let provider = Arc::new(FakeProvider::default());
    let sender = RecordingSender::new();
    let app = router(
        engine(store.clone(), provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, json!({ "mid": "mid.1", "text": "hungry" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        sender.sent(),
        vec![("user-1".to_string(), OutboundMessage::text(LOCATION_PROMPT))]
    );
    assert_eq!(store.lookups(), 0);
    assert_eq!(provider.searches(), 0);
    assert_eq!(provider.enrichments(), 0);
}

#[tokio::test]
async fn curated_place_is_recommended_without_searching() {
    let store = FakeStore::with(vec![Place::stub("p1", "Bar Marsella")]);
    let provider = Arc::new(FakeProvider::default().detail(
        "p1",
        details(37.4838, -122.1490, 4.5, "http://barmarsella.example"),
    ));
    let sender = RecordingSender::new();
    let app = router(
        engine(store.clone(), provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, body) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "EVENT_RECEIVED");

    let messages = sender.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], OutboundMessage::text(Source::Curated.headline()));
    assert_eq!(
        messages[1],
        OutboundMessage::LocationCard {
            title: "Bar Marsella".into(),
            map_image_url: Some("https://maps.googleapis.com/maps/api/staticmap?markers=color:red|label:B|37.4838,-122.149&size=360x360&zoom=13".into()),
            map_link_url: "https://www.google.com/maps/place/?q=place_id:p1".into(),
        }
    );
    assert_eq!(
        messages[2],
        OutboundMessage::text("★★★★ ½\nhttp://barmarsella.example")
    );
    assert!(!messages.contains(&OutboundMessage::text(LOCATION_PROMPT)));
    assert!(sender.sent().iter().all(|(user_id, _)| user_id == "user-1"));
    assert_eq!(provider.searches(), 0);
    assert_eq!(provider.enrichments(), 1);
}

#[tokio::test]
async fn provider_places_follow_search_order_and_survive_enrichment_failures() {
    let store = FakeStore::with(vec![]);
    let provider = Arc::new(
        FakeProvider::with(stubs(&["g1", "g2", "g3", "g4"]))
            .detail("g1", details(1.0, 1.0, 3.0, "http://g1.example"))
            .detail("g3", details(3.0, 3.0, 5.0, "http://g3.example")),
    );
    let sender = RecordingSender::new();
    let app = router(
        engine(store, provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);

    let messages = sender.messages();
    assert_eq!(messages[0], OutboundMessage::text(Source::Provider.headline()));
    let titles: Vec<_> = messages.iter().filter_map(card_title).collect();
    assert_eq!(titles, ["Place g1", "Place g2", "Place g3"]);
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[2], OutboundMessage::text("★★★\nhttp://g1.example"));
    assert_eq!(
        messages[3],
        OutboundMessage::LocationCard {
            title: "Place g2".into(),
            map_image_url: None,
            map_link_url: "https://www.google.com/maps/place/?q=place_id:g2".into(),
        }
    );
    assert_eq!(messages[5], OutboundMessage::text("★★★★★\nhttp://g3.example"));
    assert_eq!(provider.searches(), 1);
    assert_eq!(provider.enrichments(), 3);
}

#[tokio::test]
async fn sole_place_is_still_recommended_when_enrichment_fails() {
    let store = FakeStore::with(vec![Place::stub("p1", "Bar Marsella")]);
    let provider = Arc::new(FakeProvider::default());
    let sender = RecordingSender::new();
    let app = router(
        engine(store, provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        sender.messages(),
        vec![
            OutboundMessage::text(Source::Curated.headline()),
            OutboundMessage::LocationCard {
                title: "Bar Marsella".into(),
                map_image_url: None,
                map_link_url: "https://www.google.com/maps/place/?q=place_id:p1".into(),
            },
        ]
    );
    assert_eq!(provider.enrichments(), 1);
}

#[tokio::test]
async fn every_place_gets_a_card_when_all_enrichments_fail() {
    let store = FakeStore::with(stubs(&["c1", "c2", "c3"]));
    let provider = Arc::new(FakeProvider::default());
    let sender = RecordingSender::new();
    let app = router(
        engine(store, provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);

    let messages = sender.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0], OutboundMessage::text(Source::Curated.headline()));
    let titles: Vec<_> = messages.iter().filter_map(card_title).collect();
    assert_eq!(titles, ["Place c1", "Place c2", "Place c3"]);
    assert_eq!(provider.searches(), 0);
    assert_eq!(provider.enrichments(), 3);
}

#[tokio::test]
async fn failed_search_sends_nothing() {
    let provider = Arc::new(FakeProvider::failing());
    let sender = RecordingSender::new();
    let app = router(
        engine(FakeStore::failing(), provider.clone(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(sender.sent().is_empty());
    assert_eq!(provider.searches(), 1);
}

#[tokio::test]
async fn rejected_sends_do_not_fail_the_webhook() {
    let store = FakeStore::with(vec![Place::stub("p1", "Bar Marsella")]);
    let provider = Arc::new(FakeProvider::default().detail(
        "p1",
        details(37.4838, -122.1490, 4.0, "http://barmarsella.example"),
    ));
    let sender = RecordingSender::failing();
    let app = router(engine(store, provider, sender.clone()), VERIFY_TOKEN);

    let (status, _) = deliver(app, shared_location("mid.1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sender.sent().len(), 3);
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_side_effects() {
    let store = FakeStore::with(stubs(&["c1"]));
    let sender = RecordingSender::new();
    let app = router(
        engine(store.clone(), Arc::default(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = call(
        app,
        Method::POST,
        "/messenger",
        Body::from(r#"{"entry": [{"messaging": [{"message": {}}]}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(sender.sent().is_empty());
    assert_eq!(store.lookups(), 0);
}

#[tokio::test]
async fn redelivered_messages_are_handled_once() {
    let store = FakeStore::with(vec![]);
    let sender = RecordingSender::new();
    let app = router(
        engine(store, Arc::default(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (first, _) = deliver(app.clone(), json!({ "mid": "mid.7", "text": "hi" })).await;
    let (second, _) = deliver(app, json!({ "mid": "mid.7", "text": "hi" })).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn echoes_are_ignored() {
    let sender = RecordingSender::new();
    let app = router(
        engine(FakeStore::with(vec![]), Arc::default(), sender.clone()),
        VERIFY_TOKEN,
    );

    let (status, _) = deliver(app, json!({ "mid": "mid.1", "is_echo": true, "text": "hi" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(sender.sent().is_empty());
}
