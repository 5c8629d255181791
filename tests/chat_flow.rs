//! End-to-end chat flow tests against a mock backend.
//!
//! Drives the chat view with synthetic key events, lets the spawned
//! dispatch tasks hit a wiremock server, and feeds the resulting events
//! back into the view the way the application loop would.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use askdoc::core::backend::BackendClient;
use askdoc::tui::events::AppEvent;
use askdoc::tui::services::Services;
use askdoc::tui::views::chat::{ChatInputMode, ChatState, Role};

fn services_for(uri: &str) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let services = Services {
        backend: BackendClient::new(uri),
        event_tx: tx,
    };
    (services, rx)
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_and_submit(chat: &mut ChatState, services: &Services, text: &str) {
    // The view stays in insert mode after a submit; only press `i` when
    // it would switch modes rather than type a literal character.
    if chat.input_mode() != ChatInputMode::Insert {
        chat.handle_input(&key(KeyCode::Char('i')), services);
    }
    for c in text.chars() {
        chat.handle_input(&key(KeyCode::Char(c)), services);
    }
    chat.handle_input(&key(KeyCode::Enter), services);
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_question_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "question": "what is rust?",
            "k": 5,
            "score_threshold": null,
            "doc_type": null,
            "filename": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "a language"})))
        .expect(1)
        .mount(&server)
        .await;

    let (services, mut rx) = services_for(&server.uri());
    let mut chat = ChatState::new();

    // Leading/trailing whitespace is stripped before dispatch
    type_and_submit(&mut chat, &services, "  what is rust?  ");

    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].role, Role::User);
    assert_eq!(chat.messages()[0].content, "what is rust?");
    assert_eq!(chat.pending(), 1);

    match next_event(&mut rx).await {
        AppEvent::AnswerReceived(answer) => {
            chat.on_answer(answer);
        }
        other => panic!("expected AnswerReceived, got {other:?}"),
    }

    assert_eq!(chat.pending(), 0);
    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[1].role, Role::Ai);
    assert_eq!(chat.messages()[1].content, "a language");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blank_input_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let (services, mut rx) = services_for(&server.uri());
    let mut chat = ChatState::new();

    type_and_submit(&mut chat, &services, "   ");

    assert!(chat.messages().is_empty());
    assert_eq!(chat.pending(), 0);
    assert!(rx.try_recv().is_err());
    // Input survives the rejected submit
    assert_eq!(chat.input_text(), "   ");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_becomes_error_bubble() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index unavailable"))
        .mount(&server)
        .await;

    let (services, mut rx) = services_for(&server.uri());
    let mut chat = ChatState::new();

    type_and_submit(&mut chat, &services, "anything");

    match next_event(&mut rx).await {
        AppEvent::AskFailed(error) => {
            assert!(error.contains("500"));
            chat.on_ask_failed(&error);
        }
        other => panic!("expected AskFailed, got {other:?}"),
    }

    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[1].role, Role::Error);
    assert!(chat.messages()[1].content.contains("index unavailable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_answer_field_becomes_error_bubble() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sources": []})))
        .mount(&server)
        .await;

    let (services, mut rx) = services_for(&server.uri());
    let mut chat = ChatState::new();

    type_and_submit(&mut chat, &services, "anything");

    match next_event(&mut rx).await {
        AppEvent::AskFailed(error) => {
            assert!(error.contains("missing answer field"));
            chat.on_ask_failed(&error);
        }
        other => panic!("expected AskFailed, got {other:?}"),
    }

    assert_eq!(chat.messages()[1].role, Role::Error);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_answers_land_in_completion_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "question": "slow",
            "k": 5,
            "score_threshold": null,
            "doc_type": null,
            "filename": null
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"answer": "slow answer"}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "question": "fast",
            "k": 5,
            "score_threshold": null,
            "doc_type": null,
            "filename": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "fast answer"})))
        .mount(&server)
        .await;

    let (services, mut rx) = services_for(&server.uri());
    let mut chat = ChatState::new();

    // Submit the slow question first, the fast one second
    type_and_submit(&mut chat, &services, "slow");
    type_and_submit(&mut chat, &services, "fast");
    assert_eq!(chat.pending(), 2);

    let mut answers = Vec::new();
    for _ in 0..2 {
        match next_event(&mut rx).await {
            AppEvent::AnswerReceived(answer) => {
                chat.on_answer(answer.clone());
                answers.push(answer);
            }
            other => panic!("expected AnswerReceived, got {other:?}"),
        }
    }

    // Completion order, not submission order
    assert_eq!(answers, vec!["fast answer", "slow answer"]);
    assert_eq!(chat.pending(), 0);
    assert_eq!(chat.messages().len(), 4);
}
