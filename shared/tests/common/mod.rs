#![allow(dead_code)]

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use crux_core::testing::AppTester;
use crux_core::Request;
use serde_json::Value;

use shared::capabilities::{ApiRequest, ApiResponse, FixedSession};
use shared::{ApiClient, App, ClientConfig, Effect, Event, Model, UserId};

pub const BASE_URL: &str = "https://dating.example.com/api/";

pub fn client_for(user_id: i64) -> ApiClient {
    ApiClient::new(
        ClientConfig::new(BASE_URL),
        Arc::new(FixedSession(UserId(user_id))),
    )
    .expect("valid config")
}

/// Unsigned token whose `nameid` claim is `user_id`.
pub fn jwt_for(user_id: i64) -> String {
    let payload = format!(r#"{{"nameid":"{user_id}","unique_name":"member"}}"#);
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.as_bytes())
    )
}

pub fn json_response(status: u16, body: &Value) -> ApiResponse {
    ApiResponse::new(status).with_body(body.to_string())
}

pub fn message(id: i64, sender: i64, recipient: i64, content: &str, is_read: bool) -> Value {
    serde_json::json!({
        "id": id,
        "senderId": sender,
        "recipientId": recipient,
        "content": content,
        "isRead": is_read,
    })
}

pub type Tester = AppTester<App, Effect>;

/// A tester and a model already signed in as `user_id`.
pub fn signed_in(user_id: i64) -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    app.update(
        Event::SessionStarted {
            config: ClientConfig::new(BASE_URL),
            token: jwt_for(user_id),
        },
        &mut model,
    );
    assert!(model.error.is_none(), "session should start");
    (app, model)
}

pub fn api_requests(effects: Vec<Effect>) -> Vec<Request<ApiRequest>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Api(request) => Some(request),
            _ => None,
        })
        .collect()
}

/// `(method, url)` of every request on the plain HTTP effect.
pub fn http_calls(effects: &[Effect]) -> Vec<(String, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some((
                request.operation.method.clone(),
                request.operation.url.clone(),
            )),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Render(_)))
        .count()
}

/// Answers `request` and feeds the resulting events back into the app,
/// returning every effect they produce.
pub fn answer(
    app: &Tester,
    model: &mut Model,
    mut request: Request<ApiRequest>,
    response: ApiResponse,
) -> Vec<Effect> {
    let update = app
        .resolve(&mut request, Ok(response))
        .expect("request resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}
