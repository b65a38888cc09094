mod common;

use crux_core::Request;
use serde_json::json;

use common::{answer, api_requests, http_calls, json_response, message, renders, signed_in, Tester};
use shared::capabilities::{ApiRequest, ApiResponse, Method};
use shared::{ApiError, Event, MessageId, Model, UserId};

const ME: i64 = 3;
const THEM: i64 = 7;

fn open_thread(app: &Tester, model: &mut Model) -> Request<ApiRequest> {
    let update = app.update(
        Event::OpenThread {
            recipient_id: UserId(THEM),
        },
        model,
    );
    let mut requests = api_requests(update.effects);
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

fn receipt_url(message_id: i64) -> String {
    format!("https://dating.example.com/api/users/{ME}/messages/{message_id}/read")
}

#[test]
fn opening_a_thread_fetches_the_conversation() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);

    assert_eq!(request.operation.method(), Method::Get);
    assert_eq!(
        request.operation.url().path(),
        "/api/users/3/messages/thread/7"
    );
    assert!(request.operation.headers().get("Authorization").is_some());

    let view = app.view(&model);
    assert_eq!(view.thread.map(|t| t.recipient_id), Some(UserId(THEM)));
}

#[test]
fn loading_one_unread_message_issues_one_receipt_without_a_runtime() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);

    let effects = answer(
        &app,
        &mut model,
        request,
        json_response(200, &json!([message(1, THEM, ME, "hi", false)])),
    );

    assert_eq!(
        http_calls(&effects),
        vec![("POST".to_string(), receipt_url(1))]
    );
    assert_eq!(model.thread.as_ref().map(|t| t.messages().len()), Some(1));
}

#[test]
fn load_marks_only_my_unread_messages() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);

    let effects = answer(
        &app,
        &mut model,
        request,
        json_response(
            200,
            &json!([
                message(1, THEM, ME, "unread to me", false),
                message(2, THEM, ME, "already read", true),
                message(3, ME, THEM, "unread by them", false),
                message(4, THEM, ME, "also unread", false),
            ]),
        ),
    );

    let urls: Vec<_> = http_calls(&effects).into_iter().map(|(_, url)| url).collect();
    assert_eq!(urls, vec![receipt_url(1), receipt_url(4)]);
    assert!(renders(&effects) > 0);

    let view = app.view(&model).thread.unwrap();
    assert_eq!(view.messages.len(), 4);
    assert!(view.error.is_none());
}

#[test]
fn reloading_before_receipts_land_sends_them_again() {
    let (app, mut model) = signed_in(ME);
    let loaded = || Event::ThreadLoaded {
        recipient_id: UserId(THEM),
        result: Ok(vec![serde_json::from_value(message(1, THEM, ME, "hi", false)).unwrap()]),
    };
    open_thread(&app, &mut model);

    let first = app.update(loaded(), &mut model);
    let second = app.update(loaded(), &mut model);

    assert_eq!(http_calls(&first.effects).len(), 1);
    assert_eq!(http_calls(&second.effects).len(), 1);
}

#[test]
fn failed_receipts_are_only_logged() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);
    answer(
        &app,
        &mut model,
        request,
        json_response(200, &json!([message(1, THEM, ME, "hi", false)])),
    );
    let before = app.view(&model);

    let update = app.update(
        Event::ReadReceiptSent {
            message_id: MessageId(1),
            result: Err("connection refused".into()),
        },
        &mut model,
    );

    assert!(update.effects.is_empty());
    assert_eq!(app.view(&model), before);
}

#[test]
fn load_failure_is_recorded_and_list_kept() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);

    let effects = answer(
        &app,
        &mut model,
        request,
        ApiResponse::new(401).with_header("Application-Error", "Unauthorized"),
    );

    assert!(http_calls(&effects).is_empty());
    let view = app.view(&model).thread.unwrap();
    assert!(view.messages.is_empty());
    assert_eq!(view.error.as_deref(), Some("Unauthorized"));
}

#[test]
fn response_for_a_replaced_thread_is_ignored() {
    let (app, mut model) = signed_in(ME);
    open_thread(&app, &mut model);

    let update = app.update(
        Event::ThreadLoaded {
            recipient_id: UserId(42),
            result: Ok(vec![
                serde_json::from_value(message(1, 42, ME, "wrong thread", false)).unwrap(),
            ]),
        },
        &mut model,
    );

    assert!(http_calls(&update.effects).is_empty());
    assert!(model.thread.as_ref().unwrap().messages().is_empty());
}

#[test]
fn opening_a_thread_signed_out_reports_it() {
    let app = Tester::default();
    let mut model = Model::default();

    let update = app.update(
        Event::OpenThread {
            recipient_id: UserId(THEM),
        },
        &mut model,
    );

    assert!(api_requests(update.effects).is_empty());
    assert!(model.thread.is_none());
    assert_eq!(
        app.view(&model).error.as_deref(),
        Some(shared::app::NOT_SIGNED_IN)
    );
}

#[test]
fn send_prepends_created_message_and_clears_draft() {
    let (app, mut model) = signed_in(ME);
    let request = open_thread(&app, &mut model);
    answer(
        &app,
        &mut model,
        request,
        json_response(200, &json!([message(5, THEM, ME, "older", true)])),
    );

    app.update(Event::DraftChanged("hi".into()), &mut model);
    assert!(app.view(&model).thread.unwrap().can_send);

    let update = app.update(Event::SendMessage, &mut model);
    let request = api_requests(update.effects).remove(0);
    assert_eq!(request.operation.method(), Method::Post);
    assert_eq!(request.operation.url().path(), "/api/users/3/messages");
    assert_eq!(
        request.operation.body_json(),
        Some(json!({"recipientId": 7, "content": "hi"}))
    );

    answer(
        &app,
        &mut model,
        request,
        json_response(201, &message(99, ME, THEM, "hi", false)),
    );

    let view = app.view(&model).thread.unwrap();
    let ids: Vec<_> = view.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![MessageId(99), MessageId(5)]);
    assert!(view.messages[0].is_mine);
    assert!(!view.messages[1].is_mine);
    assert_eq!(view.draft_content, "");
    assert!(!view.can_send);
}

#[test]
fn send_failure_keeps_draft() {
    let (app, mut model) = signed_in(ME);
    open_thread(&app, &mut model);
    app.update(Event::DraftChanged("   ".into()), &mut model);

    let request = api_requests(app.update(Event::SendMessage, &mut model).effects).remove(0);
    answer(
        &app,
        &mut model,
        request,
        ApiResponse::new(400).with_body(r#"{"Content":["Content is required"]}"#),
    );

    let view = app.view(&model).thread.unwrap();
    assert!(view.messages.is_empty());
    assert_eq!(view.draft_content, "   ");
    assert_eq!(view.error.as_deref(), Some("Content is required\n"));
}

#[test]
fn successful_send_clears_previous_error() {
    let (app, mut model) = signed_in(ME);
    open_thread(&app, &mut model);
    app.update(
        Event::ThreadLoaded {
            recipient_id: UserId(THEM),
            result: Err(ApiError::server_error()),
        },
        &mut model,
    );

    app.update(
        Event::MessageSent {
            recipient_id: UserId(THEM),
            result: Ok(serde_json::from_value(message(100, ME, THEM, "again", false)).unwrap()),
        },
        &mut model,
    );

    let view = app.view(&model).thread.unwrap();
    assert!(view.error.is_none());
    assert_eq!(view.messages.len(), 1);
}

#[test]
fn late_results_after_closing_are_dropped() {
    let (app, mut model) = signed_in(ME);
    open_thread(&app, &mut model);
    app.update(Event::CloseThread, &mut model);

    let update = app.update(
        Event::ThreadLoaded {
            recipient_id: UserId(THEM),
            result: Ok(vec![
                serde_json::from_value(message(1, THEM, ME, "bye", false)).unwrap(),
            ]),
        },
        &mut model,
    );

    assert!(http_calls(&update.effects).is_empty());
    assert!(app.view(&model).thread.is_none());

    app.update(
        Event::ReadReceiptSent {
            message_id: MessageId(1),
            result: Ok(()),
        },
        &mut model,
    );
    assert!(model.thread.is_none());
}
