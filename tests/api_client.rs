use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use parley::api::client::ApiClient;
use parley::api::error::ApiError;
use parley::api::models::{Contact, OutgoingMessage};
use parley::session::{ChatSession, SendOutcome};

#[derive(Clone)]
struct Backend {
    users: Value,
    users_status: StatusCode,
    send_status: StatusCode,
    received: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    fn new(users: Value) -> Self {
        Self {
            users,
            users_status: StatusCode::OK,
            send_status: StatusCode::OK,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn users(State(b): State<Backend>) -> (StatusCode, Json<Value>) {
    (b.users_status, Json(b.users.clone()))
}

async fn send_message(State(b): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.received.lock().unwrap().push(body);
    (b.send_status, Json(json!({"status": "Message sent"})))
}

async fn serve(backend: Backend) -> String {
    let app = Router::new()
        .route("/users/", get(users))
        .route("/send_message/", post(send_message))
        .route("/broken/users/", get(|| async { "<html>not json</html>" }))
        .with_state(backend);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn fetches_users_in_backend_order() {
    let base = serve(Backend::new(json!([
        {"username": "carol", "email": "c@x"},
        {"username": "alice"},
        {"username": "bob"}
    ])))
    .await;
    let client = ApiClient::new(&base).unwrap();
    let contacts = client.users().await.unwrap();
    assert_eq!(contacts, vec![Contact::new("carol"), Contact::new("alice"), Contact::new("bob")]);
}

#[tokio::test]
async fn non_success_status_is_a_generic_failure() {
    let mut backend = Backend::new(json!({"detail": "nope"}));
    backend.users_status = StatusCode::NOT_FOUND;
    let base = serve(backend).await;
    let err = ApiClient::new(&base).unwrap().users().await.unwrap_err();
    match err {
        ApiError::Status { endpoint, status } => {
            assert_eq!(endpoint, "users");
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let base = serve(Backend::new(json!([]))).await;
    let client = ApiClient::new(&format!("{}/broken", base)).unwrap();
    assert!(matches!(client.users().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::new(&format!("http://{}", addr)).unwrap();
    assert!(matches!(client.users().await, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn posts_message_json() {
    let backend = Backend::new(json!([]));
    let received = backend.received.clone();
    let base = serve(backend).await;
    let client = ApiClient::new(&base).unwrap();
    let msg = OutgoingMessage {
        sender: "Me".into(),
        receiver: "Bob".into(),
        message: "hello".into(),
    };
    client.send_message(&msg).await.unwrap();
    assert_eq!(
        *received.lock().unwrap(),
        vec![json!({"sender": "Me", "receiver": "Bob", "message": "hello"})]
    );
}

#[tokio::test]
async fn session_load_select_and_send_against_http_backend() {
    let backend = Backend::new(json!({"users": ["alice", "Bob"]}));
    let received = backend.received.clone();
    let base = serve(backend).await;
    let client = ApiClient::new(&base).unwrap();

    let mut session = ChatSession::default();
    assert!(session.load_contacts(&client).await);
    assert_eq!(session.contacts(), &[Contact::new("alice"), Contact::new("Bob")]);

    session.select_contact("Bob");
    assert_eq!(session.header_text(), "Bob");
    assert_eq!(session.send(&client, "   ").await, SendOutcome::Skipped);
    assert_eq!(session.send(&client, "  see you at 5 ").await, SendOutcome::Sent);

    session.select_all_chats();
    assert_eq!(session.send(&client, "hi everyone").await, SendOutcome::Sent);

    assert_eq!(
        *received.lock().unwrap(),
        vec![
            json!({"sender": "Me", "receiver": "Bob", "message": "see you at 5"}),
            json!({"sender": "Me", "receiver": "All Chats", "message": "hi everyone"}),
        ]
    );
}

#[tokio::test]
async fn session_absorbs_backend_failures() {
    let mut backend = Backend::new(json!([]));
    backend.users_status = StatusCode::INTERNAL_SERVER_ERROR;
    backend.send_status = StatusCode::NOT_FOUND;
    let received = backend.received.clone();
    let base = serve(backend).await;
    let client = ApiClient::new(&base).unwrap();

    error_log::start();
    let mut session = ChatSession::default();
    assert!(!session.load_contacts(&client).await);
    assert!(session.contacts().is_empty());
    assert_eq!(error_log::count(), 1);

    let outcome = session.send(&client, " hello ").await;
    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(outcome.input_after(" hello ", " hello "), Some("hello".to_string()));
    assert_eq!(received.lock().unwrap().len(), 1);
    assert_eq!(error_log::count(), 2);
}

/// Counts error records logged on the current thread. The fake server runs on the same
/// current-thread runtime but logs through `tracing`, so only session errors land here.
mod error_log {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::cell::Cell;

    thread_local! {
        static ERRORS: Cell<usize> = const { Cell::new(0) };
    }

    struct ErrorCounter;

    impl Log for ErrorCounter {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() == Level::Error
        }

        fn log(&self, record: &Record) {
            if record.level() == Level::Error {
                ERRORS.with(|n| n.set(n.get() + 1));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: ErrorCounter = ErrorCounter;

    pub fn start() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Error);
        ERRORS.with(|n| n.set(0));
    }

    pub fn count() -> usize {
        ERRORS.with(|n| n.get())
    }
}
