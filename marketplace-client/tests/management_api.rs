use marketplace_client::profile::{ManagementApiClient, MetadataApi, ProfileError, UserMetadata};
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accepts one connection, answers with `response` and returns the raw request.
async fn serve_once(response: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener must bind");
    let addr = listener.local_addr().expect("listener has address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("client must connect");
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let read = socket.read(&mut chunk).await.expect("request must be read");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            if request_complete(&raw) {
                break;
            }
        }

        socket
            .write_all(response.as_bytes())
            .await
            .expect("response must be written");
        socket.shutdown().await.ok();
        String::from_utf8(raw).expect("request is utf-8")
    });

    let url = Url::parse(&format!("http://{addr}/api/v2/users")).expect("valid url");
    (url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..head_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= head_end + 4 + content_length
}

fn metadata() -> UserMetadata {
    UserMetadata {
        user_name: "bobby1".to_string(),
        phone_number: "5551234567".to_string(),
    }
}

#[tokio::test]
async fn patch_carries_bearer_token_and_nested_metadata() {
    let (url, server) =
        serve_once("HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}").await;
    let client = ManagementApiClient::with_users_url(url).expect("client must build");

    client
        .update_user_metadata("auth0|64f1", "tok-123", &metadata())
        .await
        .expect("2xx must be success");

    let request = server.await.expect("server task must finish");
    let (head, body) = request
        .split_once("\r\n\r\n")
        .expect("request has head and body");
    let head = head.to_ascii_lowercase();

    assert!(head.starts_with("patch /api/v2/users/auth0"));
    assert!(head.contains("authorization: bearer tok-123"));
    assert!(head.contains("content-type: application/json"));

    let body: serde_json::Value = serde_json::from_str(body).expect("body is json");
    assert_eq!(
        body,
        serde_json::json!({
            "user_metadata": {"user_name": "bobby1", "phone_number": "5551234567"}
        })
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (url, server) = serve_once(
        "HTTP/1.1 403 Forbidden\r\ncontent-length: 13\r\nconnection: close\r\n\r\ninsufficient!",
    )
    .await;
    let client = ManagementApiClient::with_users_url(url).expect("client must build");

    let err = client
        .update_user_metadata("auth0|64f1", "tok-123", &metadata())
        .await
        .expect_err("403 must fail");
    server.await.expect("server task must finish");

    match err {
        ProfileError::Status { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "insufficient!");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
