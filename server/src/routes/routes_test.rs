use super::*;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(api_upstream: Option<&str>) -> ServerConfig {
    ServerConfig { port: 0, api_upstream: api_upstream.map(str::to_owned), proxy_timeout_secs: 2 }
}

#[tokio::test]
async fn healthz_reports_ok() {
    let base = serve(service_routes(&config(None)).unwrap()).await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_is_not_routed_without_upstream() {
    let base = serve(service_routes(&config(None)).unwrap()).await;

    let response = reqwest::get(format!("{base}/api/auth/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_is_forwarded_with_upstream() {
    let base = serve(service_routes(&config(Some("http://127.0.0.1:1/api"))).unwrap()).await;

    let response = reqwest::get(format!("{base}/api/auth/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
