use axum::{extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::data::PortfolioConfig;
use crate::handlers::ReadmeBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::PORTFOLIO_CONFIG;

/// PUT /api/config - Overwrite the portfolio settings
pub async fn config_put(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<PortfolioConfig> {
    let config: PortfolioConfig = PORTFOLIO_CONFIG.parse(&body)?;
    state.portfolio.set_config(&config).await?;
    Ok(ApiResponse::success(config))
}

pub async fn readme_put(
    State(state): State<AppState>,
    Json(body): Json<ReadmeBody>,
) -> ApiResult<Value> {
    state.portfolio.set_readme(&body.readme).await?;
    Ok(ApiResponse::empty())
}
