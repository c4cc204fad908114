#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use reqwest::{Request, Response};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tracklog::api::client::{BoxFuture, HttpClient, Interceptor, LoggingInterceptor, Next};
    use tracklog::api::tracker::AuthInterceptor;
    use tracklog::api::{GatewayError, TrackerClient, WorklogGateway};
    use tracklog::libs::calendar::TimeSpan;

    const WORKLOGS: &str = r#"[
        {
            "self": "https://api.tracker.yandex.net/v3/issues/PRJ-1/worklog/1",
            "id": 1,
            "version": 1,
            "issue": {"self": "https://api.tracker.yandex.net/v3/issues/PRJ-1", "id": "abc", "key": "PRJ-1", "display": "Login page"},
            "comment": "layout",
            "createdBy": {"self": "https://api.tracker.yandex.net/v3/users/1", "id": "jdoe", "display": "Jane Doe"},
            "updatedBy": {"self": "https://api.tracker.yandex.net/v3/users/1", "id": "jdoe", "display": "Jane Doe"},
            "createdAt": "2024-03-04T18:00:00.000+0000",
            "updatedAt": "2024-03-04T18:00:00.000+0000",
            "start": "2024-03-04T09:00:00.000+0000",
            "duration": "PT1H30M"
        },
        {
            "issue": {"key": "PRJ-2"},
            "start": "2024-03-05T09:00:00.000+0000",
            "duration": "P1D"
        }
    ]"#;

    /// Accepts one connection, answers with `status` and `body`, and returns the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/v3/", address), handle)
    }

    fn http(interceptors: Vec<Arc<dyn Interceptor>>) -> HttpClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpClient::with_client(client, interceptors)
    }

    fn tracker(api_url: &str) -> TrackerClient {
        let auth: Arc<dyn Interceptor> = Arc::new(AuthInterceptor::new("secret-token", "org42").unwrap());
        TrackerClient::with_http(http(vec![auth, Arc::new(LoggingInterceptor)]), api_url)
    }

    fn week() -> TimeSpan<Utc> {
        TimeSpan::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_decodes_worklogs() {
        let (api_url, server) = serve_once("200 OK", WORKLOGS).await;

        let worklogs = tracker(&api_url).fetch("jdoe", &week()).await.unwrap();

        assert_eq!(worklogs.len(), 2);
        assert_eq!(worklogs[0].issue.key, "PRJ-1");
        assert_eq!(worklogs[0].issue.display, "Login page");
        assert_eq!(worklogs[0].comment, "layout");
        assert_eq!(worklogs[0].created_by.display, "Jane Doe");
        assert_eq!(worklogs[0].duration, "PT1H30M");
        assert_eq!(worklogs[1].issue.key, "PRJ-2");
        assert_eq!(worklogs[1].comment, "");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_credentials() {
        let (api_url, server) = serve_once("200 OK", "[]").await;

        tracker(&api_url).fetch("jdoe", &week()).await.unwrap();
        let request = server.await.unwrap();
        let lowered = request.to_lowercase();

        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /v3/worklog/?"), "{}", request_line);
        assert!(request_line.contains("createdBy=jdoe"));
        assert!(request_line.contains("createdAt=from%3A2024-03-04T00%3A00%3A00%2B00%3A00"));
        assert!(request_line.contains("createdAt=to%3A2024-03-11T00%3A00%3A00%2B00%3A00"));
        assert!(lowered.contains("authorization: bearer secret-token"));
        assert!(lowered.contains("x-cloud-org-id: org42"));
        assert!(lowered.contains("accept: application/json"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let (api_url, server) = serve_once("401 Unauthorized", "{}").await;

        let error = tracker(&api_url).fetch("jdoe", &week()).await.unwrap_err();
        assert!(matches!(error, GatewayError::Status(401)));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let (api_url, server) = serve_once("200 OK", "{\"errors\": {}}").await;

        let error = tracker(&api_url).fetch("jdoe", &week()).await.unwrap_err();
        assert!(matches!(error, GatewayError::Decode(_)));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = tracker(&format!("http://{}/v3/", address))
            .fetch("jdoe", &week())
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::Transport { .. }));
    }

    #[test]
    fn test_auth_interceptor_rejects_invalid_header() {
        let error = AuthInterceptor::new("line\nbreak", "org42").unwrap_err();
        assert!(matches!(error, GatewayError::InvalidHeader(_)));
    }

    /// Records the order in which it sees the request and the response.
    struct Recorder {
        name: &'static str,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Recorder {
        fn intercept<'a>(&'a self, mut request: Request, next: Next<'a>) -> BoxFuture<'a, reqwest::Result<Response>> {
            Box::pin(async move {
                let seen = request
                    .headers()
                    .get_all("x-trace")
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .collect::<Vec<_>>()
                    .join(",");
                self.events.lock().unwrap().push(format!("{} request [{}]", self.name, seen));
                request.headers_mut().append("x-trace", self.name.parse().unwrap());

                let response = next.run(request).await;
                self.events.lock().unwrap().push(format!("{} response", self.name));
                response
            })
        }
    }

    #[tokio::test]
    async fn test_interceptors_wrap_in_registration_order() {
        let (api_url, server) = serve_once("200 OK", "[]").await;
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = |name| -> Arc<dyn Interceptor> {
            Arc::new(Recorder {
                name,
                events: events.clone(),
            })
        };

        let client = http(vec![recorder("outer"), recorder("inner")]);
        let request = client.get(&api_url).build().unwrap();
        client.execute(request).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "outer request []".to_string(),
                "inner request [outer]".to_string(),
                "inner response".to_string(),
                "outer response".to_string(),
            ]
        );

        // The last registered interceptor is closest to the transport.
        let request = server.await.unwrap().to_lowercase();
        assert!(request.contains("x-trace: outer"));
        assert!(request.contains("x-trace: inner"));
    }

    #[tokio::test]
    async fn test_client_without_interceptors() {
        let (api_url, server) = serve_once("200 OK", "[]").await;

        let client = http(Vec::new());
        let request = client.get(&api_url).build().unwrap();
        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.contains("content-type: application/json"));
        assert!(!request.contains("authorization"));
    }
}
