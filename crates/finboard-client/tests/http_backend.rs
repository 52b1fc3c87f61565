use finboard_client::{BankBackend, ClientConfig, HttpBackend};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answers exactly one HTTP request with `status` and `body`, and hands back
/// the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("loopback listener should bind");
    };
    let Ok(address) = listener.local_addr() else {
        panic!("listener should have an address");
    };

    let handle = tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return String::new();
        };
        let mut request = Vec::new();
        let mut buffer = [0u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match socket.read(&mut buffer).await {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&buffer[..read]),
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{address}"), handle)
}

fn backend_for(base_url: &str, token: Option<&str>) -> HttpBackend {
    let config = ClientConfig {
        api_url: base_url.to_string(),
        quotes_url: format!("{base_url}/stocks"),
        token: token.map(str::to_string),
        ..ClientConfig::default()
    };
    let Ok(backend) = HttpBackend::new(&config) else {
        panic!("backend should build");
    };
    backend
}

#[tokio::test]
async fn history_request_carries_account_and_token() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"status":"success","data":[{"id":"t1","type":"DEPOSIT","amount":5,"timestamp":"2025-01-01"}]}"#,
    )
    .await;
    let backend = backend_for(&base_url, Some("secret-token"));

    let records = backend.fetch_transactions(" ACC-1 ").await;
    assert!(records.is_ok());
    if let Ok(list) = records {
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "t1");
    }

    let request = server.await.unwrap_or_default();
    assert!(request.starts_with("GET /api/history?accountId=ACC-1 HTTP/1.1"));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("authorization: bearer secret-token")
    );
}

#[tokio::test]
async fn unauthorized_responses_ask_for_a_new_login() {
    let (base_url, server) = serve_once("401 Unauthorized", r#"{"message":"expired"}"#).await;
    let backend = backend_for(&base_url, None);

    let result = backend.fetch_transactions("ACC-1").await;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "auth_required");
    }
    let _ = server.await;
}

#[tokio::test]
async fn server_errors_and_html_pages_are_fetch_errors() {
    let (base_url, server) = serve_once("500 Internal Server Error", "{}").await;
    let result = backend_for(&base_url, None).fetch_transactions("ACC-1").await;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "fetch_failed");
    }
    let _ = server.await;

    let (base_url, server) = serve_once("200 OK", "<html><body>Sign in</body></html>").await;
    let result = backend_for(&base_url, None).fetch_transactions("ACC-1").await;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "unrecognized_envelope");
    }
    let _ = server.await;
}

#[tokio::test]
async fn blank_account_fails_before_any_request() {
    let backend = backend_for("http://127.0.0.1:9", None);
    let result = backend.fetch_transactions("   ").await;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "account_required");
    }
}

#[tokio::test]
async fn quotes_and_holdings_are_parsed() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"symbol":"ACME","currentPrice":12.5,"buyPrice":10}]"#,
    )
    .await;
    let quotes = backend_for(&base_url, None).fetch_quotes().await;
    assert!(quotes.is_ok());
    if let Ok(list) = quotes {
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].current_price, 12.5);
    }
    let request = server.await.unwrap_or_default();
    assert!(request.starts_with("GET /stocks HTTP/1.1"));

    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"holdings":[{"stockSymbol":"ACME","quantity":3,"averageBuyPrice":9.5}]}"#,
    )
    .await;
    let holdings = backend_for(&base_url, None).fetch_holdings("ACC-1").await;
    assert!(holdings.is_ok());
    if let Ok(list) = holdings {
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].quantity, 3.0);
        assert_eq!(list[0].average_buy_price, Some(9.5));
    }
    let request = server.await.unwrap_or_default();
    assert!(request.starts_with("GET /api/portfolio?accountId=ACC-1 HTTP/1.1"));
}
