use crate::{
    application::app::Application,
    domain::{
        errors::{LedgerError, StorageError},
        models::{AccountId, AccountSummary, Amount, Transaction},
    },
    infrastructure::shutdown::Shutdown,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{future::IntoFuture, sync::Arc};
use tower_http::cors::CorsLayer;

pub fn router<A>(app: Arc<A>) -> Router
where
    A: Application + Send + Sync + 'static,
{
    Router::new()
        .route("/accounts", get(get_accounts::<A>).post(open_account::<A>))
        .route("/accounts/:id", get(get_account::<A>))
        .route("/accounts/:id/balance", get(get_balance::<A>))
        .route("/accounts/:id/transactions", get(get_transactions::<A>))
        .route("/accounts/:id/counterparties", get(get_counterparties::<A>))
        .route("/transfers", post(transfer::<A>))
        .with_state(app)
        .layer(CorsLayer::permissive())
}

pub async fn start_server<A, S>(shutdown: S, app: Arc<A>, port: u16) -> anyhow::Result<()>
where
    A: Application + Send + Sync + 'static,
    S: Shutdown,
{
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    let server = axum::serve(listener, router(app)).into_future();

    tracing::info!("API server started on port {}", port);

    let mut shutdown_rx = shutdown.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => {
            tracing::warn!("API server received shutdown signal");
        }
        result = server => {
            tracing::warn!("API server stopped unexpectedly");
            result?;
        }
    }

    Ok(())
}

/// HTTP status for a rejected request.
pub fn status_of(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::Storage(StorageError::AccountNotFound(_)) => StatusCode::NOT_FOUND,
        LedgerError::Storage(StorageError::AccountAlreadyExists(_))
        | LedgerError::OutOfOrder { .. } => StatusCode::CONFLICT,
        LedgerError::InvalidAmount(_)
        | LedgerError::SelfTransfer(_)
        | LedgerError::ReservedAccount(_)
        | LedgerError::InsufficientFunds { .. }
        | LedgerError::BalanceOverflow { .. }
        | LedgerError::TimestampOutOfRange { .. }
        | LedgerError::BeforeAccountOpened { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

type ApiError = (StatusCode, Json<Value>);

fn reject(error: LedgerError) -> ApiError {
    let status = status_of(&error);
    (status, Json(json!({ "error": error.to_string() })))
}

/// Clamps a signed `k` so that non-positive values ask for nothing.
fn limit(k: Option<i64>, default: usize) -> usize {
    k.map_or(default, |k| usize::try_from(k).unwrap_or(0))
}

#[derive(Deserialize)]
struct OpenAccountRequest {
    seed: Amount,
    at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TransferRequest {
    origin: AccountId,
    destination: AccountId,
    amount: Amount,
    at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct BalanceQuery {
    at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct LimitQuery {
    k: Option<i64>,
}

async fn get_accounts<A: Application>(
    State(app_state): State<Arc<A>>,
) -> Result<Json<Vec<AccountSummary>>, ApiError> {
    app_state.get_accounts().await.map(Json).map_err(reject)
}

async fn open_account<A: Application>(
    State(app_state): State<Arc<A>>,
    Json(request): Json<OpenAccountRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = app_state
        .open_account(request.seed, request.at)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn get_account<A: Application>(
    State(app_state): State<Arc<A>>,
    Path(id): Path<u64>,
) -> Result<Json<AccountSummary>, ApiError> {
    app_state
        .get_account(AccountId::new(id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn get_balance<A: Application>(
    State(app_state): State<Arc<A>>,
    Path(id): Path<u64>,
    Query(params): Query<BalanceQuery>,
) -> Result<Json<Value>, ApiError> {
    let balance = app_state
        .get_balance(AccountId::new(id), params.at)
        .await
        .map_err(reject)?;
    Ok(Json(json!({ "account": id, "balance": balance, "at": params.at })))
}

async fn get_transactions<A: Application>(
    State(app_state): State<Arc<A>>,
    Path(id): Path<u64>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    app_state
        .get_recent_transactions(AccountId::new(id), limit(params.k, 10))
        .await
        .map(Json)
        .map_err(reject)
}

async fn get_counterparties<A: Application>(
    State(app_state): State<Arc<A>>,
    Path(id): Path<u64>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<AccountId>>, ApiError> {
    app_state
        .get_top_counterparties(AccountId::new(id), limit(params.k, 5))
        .await
        .map(Json)
        .map_err(reject)
}

async fn transfer<A: Application>(
    State(app_state): State<Arc<A>>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let transaction = app_state
        .transfer(request.origin, request.destination, request.amount, request.at)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_limit_is_empty() {
        assert_eq!(limit(Some(-3), 10), 0);
        assert_eq!(limit(Some(0), 10), 0);
        assert_eq!(limit(Some(4), 10), 4);
        assert_eq!(limit(None, 10), 10);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(&LedgerError::Storage(StorageError::AccountNotFound(
                AccountId::new(1)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&LedgerError::InvalidAmount(0)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(&LedgerError::OutOfOrder {
                last: Utc::now(),
                submitted: Utc::now(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&LedgerError::BalanceOverflow {
                account: AccountId::new(2),
                balance: Amount::MAX,
                amount: 1,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
