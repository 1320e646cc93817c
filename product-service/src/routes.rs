use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Build and configure the application router
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // Every product route runs the token verifier first
    let products = Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .merge(products)
        // Middleware
        .layer(cors_layer(allowed_origins))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use catalog::CacheAsideProductStore;
    use catalog::auth::defaults::seed_credential;
    use catalog::auth::{
        DEFAULT_TOKEN_TTL, SledCredentialRepository, StaticSecret, TokenKeys, TokenService,
        TokenVerifier,
    };
    use catalog::persistence::SledProductStore;
    use catalog::ports::FastCache;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use storage_engine::MokaFastCache;
    use tower::ServiceExt;

    const SECRET: &str = "product-service-test-secret";

    struct Harness {
        router: Router,
        cache: Arc<MokaFastCache>,
    }

    fn harness() -> Harness {
        let cache = Arc::new(MokaFastCache::unbounded());
        let primary = Arc::new(SledProductStore::temporary().unwrap());
        let products = Arc::new(CacheAsideProductStore::new(primary, cache.clone(), "products"));
        let verifier = Arc::new(TokenVerifier::new(keys(SECRET)));

        let router = build_router(AppState::new(products, verifier), &["*".to_string()]);
        Harness { router, cache }
    }

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::from_provider(&StaticSecret::new(secret))
    }

    /// Issue a token the way the user service would, from its own process state
    async fn token_for(subject: &str, secret: &str) -> String {
        let repo = Arc::new(SledCredentialRepository::temporary().unwrap());
        seed_credential(repo.as_ref(), subject, "password123")
            .await
            .unwrap();
        TokenService::new(repo, keys(secret), DEFAULT_TOKEN_TTL)
            .issue(subject, "password123")
            .await
            .unwrap()
            .token
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let h = harness();
        let response = h
            .router
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "UP");
        assert_eq!(body["service"], "product-service");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let h = harness();
        let response = h
            .router
            .oneshot(request("GET", "/products", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Missing token");
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let h = harness();
        let req = Request::builder()
            .uri("/products")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let response = h.router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Malformed token");
    }

    #[tokio::test]
    async fn test_empty_bearer_is_missing_token() {
        let h = harness();
        let req = Request::builder()
            .uri("/products")
            .header(header::AUTHORIZATION, "Bearer ")
            .body(Body::empty())
            .unwrap();
        let response = h.router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Missing token");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_rejected() {
        let h = harness();
        let token = token_for("alice", "not-the-shared-secret").await;

        let response = h
            .router
            .oneshot(request("GET", "/products", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let h = harness();
        let token = token_for("alice", SECRET).await;

        let response = h
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/products",
                Some(&token),
                Some(json!({"name": "Widget"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert!(body["details"].as_str().unwrap().contains("price"));

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/products")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let h = harness();
        let token = token_for("alice", SECRET).await;

        let cases = [
            request("GET", "/products/404", Some(&token), None),
            request(
                "PUT",
                "/products/404",
                Some(&token),
                Some(json!({"name": "Ghost", "price": 1.0})),
            ),
            request("DELETE", "/products/404", Some(&token), None),
        ];

        for req in cases {
            let response = h.router.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let h = harness();
        let token = token_for("alice", SECRET).await;

        let response = h
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/products",
                Some(&token),
                Some(json!({"name": "Widget", "price": 9.99, "stock": 5})),
            ))
            .await
            .unwrap();
        let id = read_json(response).await["id"].as_i64().unwrap();

        let response = h
            .router
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/products/{id}"),
                Some(&token),
                Some(json!({"name": "Widget Pro", "price": 14.5})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["message"], "Product updated");

        let response = h
            .router
            .oneshot(request("GET", &format!("/products/{id}"), Some(&token), None))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["name"], "Widget Pro");
        assert_eq!(body["price"], 14.5);
        assert_eq!(body["stock"], 0);
    }

    #[tokio::test]
    async fn test_login_create_list_delete_flow() {
        let h = harness();
        let token = token_for("alice", SECRET).await;

        // create
        let response = h
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/products",
                Some(&token),
                Some(json!({"name": "Widget", "price": 9.99})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = read_json(response).await["id"].as_i64().unwrap();
        assert!(h.cache.get("products").await.unwrap().is_none());

        // list misses, reads the store and repopulates
        let response = h
            .router
            .clone()
            .oneshot(request("GET", "/products", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], id);
        assert_eq!(listed[0]["name"], "Widget");
        assert_eq!(listed[0]["price"], 9.99);
        assert!(h.cache.get("products").await.unwrap().is_some());

        // delete invalidates
        let response = h
            .router
            .clone()
            .oneshot(request("DELETE", &format!("/products/{id}"), Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(h.cache.get("products").await.unwrap().is_none());

        let response = h
            .router
            .oneshot(request("GET", &format!("/products/{id}"), Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
