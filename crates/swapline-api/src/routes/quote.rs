//! Pool listing and swap quote routes

use amm::{AmmError, SwapQuote};
use axum::{extract::State, http::StatusCode, Json};
use chain_reader::CancelToken;

use crate::dto::{ApiError, PoolsResponse, QuoteRequestDto, RoutesResponse};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn amm_error(e: AmmError) -> (StatusCode, Json<ApiError>) {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::warn!("Quote failed: {}", e);
    } else {
        tracing::debug!("Quote rejected: {}", e);
    }
    (status, Json(ApiError::from(&e)))
}

/// GET /pools - Current routable pools
pub async fn get_pools(State(state): State<AppState>) -> ApiResult<PoolsResponse> {
    let config = state.config().await;
    let reader = state.reader();

    let market = amm::load_pool_graph(
        reader.as_ref(),
        config.router.read_timeout(),
        &CancelToken::new(),
    )
    .await
    .map_err(amm_error)?;

    let pools = market.graph.pools().to_vec();
    Ok(Json(PoolsResponse {
        source: reader.source_name().to_string(),
        count: pools.len(),
        pools,
        inert: market.graph.inert_count(),
        failed: market.failed_pools,
    }))
}

/// POST /quote - Best route for a swap
pub async fn get_quote(
    State(state): State<AppState>,
    Json(dto): Json<QuoteRequestDto>,
) -> ApiResult<SwapQuote> {
    let config = state.config().await;
    let request = dto.to_request(&config.router);
    let session = dto.session.as_deref();
    let cancel = state.begin_quote(session).await;

    let reader = state.reader();
    let result = amm::quote_swap_live(reader.as_ref(), &config.router, &request, &cancel).await;
    state.end_quote(session, &cancel).await;

    result.map(Json).map_err(amm_error)
}

/// POST /routes - Ranked route alternatives
pub async fn get_routes(
    State(state): State<AppState>,
    Json(dto): Json<QuoteRequestDto>,
) -> ApiResult<RoutesResponse> {
    let config = state.config().await;
    let request = dto.to_request(&config.router);
    let session = dto.session.as_deref();
    let cancel = state.begin_quote(session).await;

    let reader = state.reader();
    let result = amm::rank_routes_live(reader.as_ref(), &config.router, &request, &cancel).await;
    state.end_quote(session, &cancel).await;

    let routes = result.map_err(amm_error)?;
    Ok(Json(RoutesResponse {
        count: routes.len(),
        routes,
    }))
}
