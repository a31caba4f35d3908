/*!
 * MyMemory client tests against a local one-shot HTTP server
 */

use bilinguo::ProviderError;
use bilinguo::providers::mymemory::MyMemory;
use bilinguo::providers::{TranslationGateway, TranslationRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve a single canned response; yields the request head that was received
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/get", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&head).into_owned()
    });

    (endpoint, handle)
}

#[tokio::test]
async fn test_fetch_withSuccessfulResponse_shouldSendWordAndLanguagePair() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"responseData":{"translatedText":"gato","match":1},"responseStatus":200}"#,
    )
    .await;
    let gateway = MyMemory::new(endpoint, 5);

    let result = gateway.fetch(&TranslationRequest::new("cat", "en", "es")).await;

    assert_eq!(result, Ok("gato".to_string()));
    let head = server.await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.starts_with("GET /get?"));
    assert!(request_line.contains("q=cat"));
    assert!(request_line.contains("langpair=en%7Ces"));
}

#[tokio::test]
async fn test_fetch_withErrorStatus_shouldReportApiError() {
    let (endpoint, server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#).await;
    let gateway = MyMemory::new(endpoint, 5);

    let result = gateway.fetch(&TranslationRequest::new("cat", "en", "es")).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 503, .. })));
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_withInBodyErrorStatus_shouldReportApiError() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"responseData":{"translatedText":"INVALID LANGUAGE PAIR"},"responseStatus":"403","responseDetails":"INVALID LANGUAGE PAIR"}"#,
    )
    .await;
    let gateway = MyMemory::new(endpoint, 5);

    let result = gateway.fetch(&TranslationRequest::new("cat", "en", "xx")).await;

    assert_eq!(
        result,
        Err(ProviderError::ApiError { status_code: 403, message: "INVALID LANGUAGE PAIR".to_string() })
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_withMalformedBody_shouldReportParseError() {
    let (endpoint, server) = serve_once("200 OK", "<html>oops</html>").await;
    let gateway = MyMemory::new(endpoint, 5);

    let result = gateway.fetch(&TranslationRequest::new("cat", "en", "es")).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_withEchoedWord_shouldReportNoTranslation() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"responseData":{"translatedText":"cat"},"responseStatus":200}"#,
    )
    .await;
    let gateway = MyMemory::new(endpoint, 5);

    let result = gateway.fetch(&TranslationRequest::new("cat", "en", "es")).await;

    assert_eq!(result, Err(ProviderError::NoTranslation { word: "cat".to_string() }));
    server.await.unwrap();
}
