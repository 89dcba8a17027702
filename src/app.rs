use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthService, AuthSettings, AuthStore, TokenStore};
use crate::config::AppConfig;
use crate::data::{
    ClassifierStore, DataDirectory, GitBootstrap, GitCli, GroupStore, PortfolioStore, RepoCloner,
};
use crate::handlers::{protected, public};
use crate::middleware::require_token;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data: DataDirectory,
    pub groups: GroupStore,
    pub classifiers: ClassifierStore,
    pub portfolio: PortfolioStore,
    pub bootstrap: GitBootstrap,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    /// State that clones repositories with the `git` executable
    pub fn new(config: AppConfig) -> Self {
        let cloner = GitCli::new(config.clone_timeout());
        Self::with_cloner(config, Arc::new(cloner))
    }

    pub fn with_cloner(config: AppConfig, cloner: Arc<dyn RepoCloner>) -> Self {
        let data = DataDirectory::new(&config.storage.data_dir);
        let bootstrap = GitBootstrap::new(data.clone(), cloner);
        let tokens = Arc::new(TokenStore::new());
        let auth = AuthService::new(
            AuthStore::new(&config.storage.private_dir),
            tokens.clone(),
            bootstrap.clone(),
            AuthSettings {
                fail_jitter: config.fail_jitter(),
                min_password_length: config.auth.min_password_length,
            },
        );

        Self {
            groups: GroupStore::new(data.clone()),
            classifiers: ClassifierStore::new(data.clone()),
            portfolio: PortfolioStore::new(data.clone()),
            config: Arc::new(config),
            data,
            bootstrap,
            auth: Arc::new(auth),
            tokens,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health))
        // Setup and token acquisition
        .route("/api/admin/setup", post(public::admin::setup))
        .route("/api/admin/firstrun", post(public::admin::firstrun))
        .route("/api/admin/auth/login", post(public::auth::login))
        .route("/api/admin/auth/logout", post(public::auth::logout))
        // Read-only data access
        .route("/api/config", get(public::config::config_get))
        .route("/api/config/readme", get(public::config::readme_get))
        .route("/api/group", get(public::group::group_list))
        .route("/api/group/:group_id/info", get(public::group::info_get))
        .route("/api/group/:group_id/brief", get(public::group::brief_get))
        .route("/api/group/:group_id/readme", get(public::group::readme_get))
        .route("/api/group/:group_id/classifier", get(public::group::classifier_list))
        .route(
            "/api/group/:group_id/classifier/:classifier_id/info",
            get(public::group::classifier_info_get),
        )
        .route(
            "/api/group/:group_id/classifier/:classifier_id/readme",
            get(public::group::classifier_readme_get),
        )
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        // Credential management
        .route("/api/admin/auth/change", post(protected::auth::change))
        .route("/api/admin/auth/revoke", post(protected::auth::revoke))
        .route("/api/admin/auth/disable", post(protected::auth::disable))
        // Data mutation
        .route("/api/config", put(protected::config::config_put))
        .route("/api/config/readme", put(protected::config::readme_put))
        .route("/api/group/:group_id", post(protected::group::group_create))
        .route("/api/group/:group_id/info", put(protected::group::info_put))
        .route("/api/group/:group_id/readme", put(protected::group::readme_put))
        .route(
            "/api/group/:group_id/classifier/:classifier_id",
            post(protected::group::classifier_create),
        )
        .route(
            "/api/group/:group_id/classifier/:classifier_id/info",
            put(protected::group::classifier_info_put),
        )
        .route(
            "/api/group/:group_id/classifier/:classifier_id/readme",
            put(protected::group::classifier_readme_put),
        )
        .route_layer(middleware::from_fn_with_state(state, require_token))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCloner, TestContext};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_router(ctx: &TestContext) -> Router {
        let config = AppConfig::with_paths(ctx.data_path(), ctx.private_path());
        router(AppState::with_cloner(config, Arc::new(FakeCloner::empty())))
    }

    #[tokio::test]
    async fn health_responds() {
        let ctx = TestContext::new();
        let res = test_router(&ctx)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mutations_require_token_but_reads_do_not() {
        let ctx = TestContext::initialized().await;
        let app = test_router(&ctx);

        let res = app
            .clone()
            .oneshot(
                Request::post("/api/group/my-group")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"My group","description":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .oneshot(Request::get("/api/group").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
