use std::sync::Arc;

use kubechat_common::{Event, EventBus};
use kubechat_config::schema::BackendConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::*;
use crate::profile::ProfileStore;
use crate::types::{SessionSummary, UserProfile, UserRole};
use crate::SessionStore;

fn config(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.into(),
        ..BackendConfig::default()
    }
}

/// Request line plus body as seen by the stub server.
struct Captured {
    request_line: String,
    body: String,
}

/// Serve `responses` in order, one per connection, reporting each request.
async fn stub_server(
    responses: Vec<(u16, &'static str)>,
) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut socket).await;
            let _ = tx.send(captured);
            let response = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if n == 0 {
            break buf.len();
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Captured {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

fn boundary(dir: &tempfile::TempDir) -> (Arc<AuthBoundary>, Arc<EventBus>) {
    let events = Arc::new(EventBus::new(16));
    let store = ProfileStore::new(dir.path().join("user.json"));
    (Arc::new(AuthBoundary::new(store, Arc::clone(&events))), events)
}

#[test]
fn rejects_unusable_base_url() {
    assert!(matches!(
        BackendClient::new(&config("not a url")),
        Err(ApiError::Config(_))
    ));
    assert!(matches!(
        BackendClient::new(&config("mailto:ops@example.com")),
        Err(ApiError::Config(_))
    ));
}

#[test]
fn endpoint_joins_and_escapes_segments() {
    let client = BackendClient::new(&config("http://localhost:5000")).unwrap();
    let url = client.endpoint(&["user", "sessions", "a b/c"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:5000/user/sessions/a%20b%2Fc");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let client = BackendClient::new(&config("https://ops.example.com/api")).unwrap();
    let url = client.endpoint(&["chat"]).unwrap();
    assert_eq!(url.as_str(), "https://ops.example.com/api/chat");
}

#[test]
fn lists_may_be_bare_or_wrapped() {
    let bare = serde_json::json!([{ "session_id": "s1" }]);
    let wrapped = serde_json::json!({ "sessions": [{ "session_id": "s2" }], "count": 1 });

    let a: Vec<SessionSummary> = unwrap_list(bare, "sessions").unwrap();
    let b: Vec<SessionSummary> = unwrap_list(wrapped, "sessions").unwrap();
    assert_eq!(a[0].id, "s1");
    assert_eq!(b[0].id, "s2");

    let missing = serde_json::json!({ "history": [] });
    assert!(matches!(
        unwrap_list::<SessionSummary>(missing, "sessions"),
        Err(ApiError::Parse(_))
    ));
}

#[test]
fn records_may_be_bare_or_wrapped() {
    let wrapped = serde_json::json!({ "success": true, "session": { "session_id": "s9", "title": "Pods" } });
    let bare = serde_json::json!({ "id": 12, "title": "Nodes" });

    let a: SessionSummary = unwrap_object(wrapped, "session").unwrap();
    let b: SessionSummary = unwrap_object(bare, "session").unwrap();
    assert_eq!(a.id, "s9");
    assert_eq!(a.title.as_deref(), Some("Pods"));
    assert_eq!(b.id, "12");
}

#[tokio::test]
async fn list_sessions_sends_user_id_query() {
    let (base, mut requests) = stub_server(vec![(
        200,
        r#"{"sessions": [{"session_id": "s1", "title": "Pods", "message_count": 4}]}"#,
    )])
    .await;
    let client = BackendClient::new(&config(&base)).unwrap();

    let sessions = client.list_sessions(7).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 4);

    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.request_line, "GET /user/sessions?user_id=7 HTTP/1.1");
}

#[tokio::test]
async fn rename_puts_title_body() {
    let (base, mut requests) = stub_server(vec![(200, r#"{"success": true}"#)]).await;
    let client = BackendClient::new(&config(&base)).unwrap();

    client.rename_session(7, "s1", "Node pressure").await.unwrap();

    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.request_line, "PUT /user/sessions/s1 HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["user_id"], 7);
    assert_eq!(body["title"], "Node pressure");
}

#[tokio::test]
async fn unauthorized_reaches_auth_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, events) = boundary(&dir);
    auth.profile_store()
        .save(&UserProfile {
            id: 7,
            username: "alice".into(),
            email: None,
            role: UserRole::User,
        })
        .unwrap();
    let mut rx = events.subscribe();

    let (base, _requests) = stub_server(vec![(401, r#"{"error": "Authentication required"}"#)]).await;
    let client = BackendClient::new(&config(&base))
        .unwrap()
        .with_auth_boundary(Arc::clone(&auth));

    let err = client.list_sessions(7).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized(401));
    assert!(matches!(rx.recv().await.unwrap(), Event::SessionExpired { status: 401 }));
    assert_eq!(auth.profile_store().load().unwrap(), None);
}

#[tokio::test]
async fn rejected_login_is_not_a_session_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, events) = boundary(&dir);
    let mut rx = events.subscribe();

    let (base, _requests) = stub_server(vec![(401, r#"{"error": "Invalid credentials"}"#)]).await;
    let client = BackendClient::new(&config(&base))
        .unwrap()
        .with_auth_boundary(auth);

    let err = client.login("alice", "wrong-password").await.unwrap_err();
    assert!(matches!(err, AuthError::Api(ApiError::Unauthorized(401))));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn login_caches_profile() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _events) = boundary(&dir);

    let (base, mut requests) = stub_server(vec![(
        200,
        r#"{"success": true, "user": {"id": 7, "username": "alice", "role": "admin"}}"#,
    )])
    .await;
    let client = BackendClient::new(&config(&base))
        .unwrap()
        .with_auth_boundary(Arc::clone(&auth));

    let profile = client.login(" alice ", "s3cretpass").await.unwrap();
    assert!(profile.is_admin());
    assert_eq!(client.current_user(), Some(profile));

    let captured = requests.recv().await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn current_user_follows_login_and_logout() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _events) = boundary(&dir);
    let (base, _requests) = stub_server(vec![
        (
            200,
            r#"{"user": {"id": 3, "username": "carol", "email": "carol@example.com", "role": "user"}}"#,
        ),
        (200, "{}"),
    ])
    .await;
    let client = BackendClient::new(&config(&base))
        .unwrap()
        .with_auth_boundary(auth);
    assert_eq!(client.current_user(), None);

    client.login("carol", "s3cretpass").await.unwrap();
    let cached = client.current_user().unwrap();
    assert_eq!(cached.username, "carol");
    assert_eq!(cached.email.as_deref(), Some("carol@example.com"));
    assert_eq!(cached.role, UserRole::User);

    client.logout().await.unwrap();
    assert_eq!(client.current_user(), None);
}

#[test]
fn current_user_without_auth_boundary_is_none() {
    let client = BackendClient::new(&config("http://127.0.0.1:9")).unwrap();
    assert_eq!(client.current_user(), None);
}

#[tokio::test]
async fn invalid_signup_never_hits_network() {
    // Nothing listens here; a network attempt would surface as ApiError.
    let client = BackendClient::new(&config("http://127.0.0.1:9")).unwrap();
    let err = client.signup("a", "nope", "short").await.unwrap_err();
    match err {
        AuthError::Form(errors) => assert_eq!(errors.len(), 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn activity_logs_omit_missing_user_filter() {
    let (base, mut requests) = stub_server(vec![(200, r#"{"logs": []}"#)]).await;
    let client = BackendClient::new(&config(&base)).unwrap();

    let logs = client.activity_logs(25, None).await.unwrap();
    assert!(logs.is_empty());
    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.request_line, "GET /admin/logs?limit=25 HTTP/1.1");
}

#[tokio::test]
async fn resource_actions_use_kind_path() {
    let (base, mut requests) = stub_server(vec![(
        200,
        r#"{"success": true, "message": "Connected to cluster"}"#,
    )])
    .await;
    let client = BackendClient::new(&config(&base)).unwrap();

    let result = client
        .test_resource(ManagedResource::ApiKeys, 3)
        .await
        .unwrap();
    assert!(result.success);
    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.request_line, "POST /admin/api-keys/3/test HTTP/1.1");
}
