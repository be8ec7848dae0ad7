//! HTTP service exposing the crash game as user/game/bet operations.
//!
//! The service is a consumer of the core: it generates rounds through
//! [`RoundGenerator`], records them in the [`MemoryStore`], and gates bets
//! through the caller-owned [`SafetyManager`]. Stakes are debited when a bet
//! is placed; cashing out credits `amount * multiplier`, and a crash settles
//! every un-cashed bet at zero payout.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ApiConfig;
use crate::entropy::OsEntropy;
use crate::round::{self, RoundGenerator};
use crate::safety::SafetyManager;
use crate::storage::{Bet, MemoryStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
    safety: Arc<Mutex<SafetyManager>>,
}

impl AppState {
    pub fn new(store: MemoryStore, safety: SafetyManager) -> Self {
        Self {
            store: Arc::new(store),
            safety: Arc::new(Mutex::new(safety)),
        }
    }

    /// Start a new provably-fair game and record it. Only the hash is
    /// published to clients until the round resolves.
    fn start_game(&self) -> crate::storage::Game {
        let mut entropy = OsEntropy;
        let round = RoundGenerator::new(&mut entropy).round();
        self.store.insert_game(
            round.commitment.seed,
            round.commitment.hash,
            round.crash_multiplier,
        )
    }

    /// Place a stake on a game, debiting the user's balance up front.
    async fn place_bet(&self, user_id: u64, game_id: u64, amount: f64) -> Result<Bet, ApiError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ApiError::bad_request("bet amount must be positive"));
        }
        let user = self.store.user(user_id)?;
        self.store.game(game_id)?;

        let safety = self.safety.lock().await;
        if !safety.check_bet(user.balance, amount) {
            return Err(ApiError::bad_request("bet rejected by safety limits"));
        }
        drop(safety);

        self.store.debit_user(user_id, amount)?;
        Ok(self.store.insert_bet(user_id, game_id, amount)?)
    }

    /// Cash a bet out at `multiplier`, if the round has not crashed below it.
    async fn cash_out(&self, bet_id: u64, multiplier: f64) -> Result<f64, ApiError> {
        let bet = self.store.bet(bet_id)?;
        if bet.payout.is_some() {
            return Err(ApiError::bad_request("bet already settled"));
        }
        let game = self.store.game(bet.game_id)?;
        if multiplier > game.crash_multiplier {
            return Err(ApiError::bad_request("cannot cash out after crash"));
        }

        let payout = bet.amount * multiplier;
        self.store.settle_bet(bet_id, Some(multiplier), payout)?;
        self.store.credit_user(bet.user_id, payout)?;

        let mut safety = self.safety.lock().await;
        safety.record_outcome(bet.user_id, bet.amount, payout - bet.amount);
        Ok(payout)
    }

    /// Crash the game: every bet that never cashed out loses its stake.
    async fn crash_game(&self, game_id: u64) -> Result<(f64, usize), ApiError> {
        let game = self.store.game(game_id)?;
        let bets = self.store.bets_for_game(game_id);
        let count = bets.len();

        let mut safety = self.safety.lock().await;
        for bet in bets {
            if bet.payout.is_none() {
                self.store.settle_bet(bet.id, None, 0.0)?;
                safety.record_outcome(bet.user_id, bet.amount, -bet.amount);
            }
        }
        Ok((game.crash_multiplier, count))
    }
}

pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(root))
            .route("/user/create", post(create_user))
            .route("/user/:id/balance", get(user_balance))
            .route("/game/start", post(game_start))
            .route("/game/crash/:id", post(game_crash))
            .route("/bet", post(place_bet))
            .route("/bet/cashout/:id", post(bet_cashout))
            .route("/verify", get(verify_round))
            .layer(cors)
            .with_state(state)
    }

    pub async fn serve(self) -> Result<()> {
        let addr = SocketAddr::from((self.config.host, self.config.port));
        let app = Self::router(self.state);
        info!("API server listening on http://{}", addr);
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await?;
        Ok(())
    }
}

/// Error DTO carrying a status code and a JSON detail body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::UserNotFound(_)
            | StoreError::GameNotFound(_)
            | StoreError::BetNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::DuplicateUsername(_) => StatusCode::CONFLICT,
            StoreError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the crash game simulator API" }))
}

#[derive(Deserialize)]
struct CreateUserPayload {
    username: String,
}

#[derive(Serialize)]
struct UserResponse {
    user_id: u64,
    username: String,
    balance: f64,
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.create_user(&payload.username)?;
    Ok(Json(UserResponse {
        user_id: user.id,
        username: user.username,
        balance: user.balance,
    }))
}

async fn user_balance(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.store.user(id)?;
    Ok(Json(json!({ "balance": user.balance })))
}

#[derive(Serialize)]
struct GameStartResponse {
    game_id: u64,
    hash: String,
}

async fn game_start(State(state): State<AppState>) -> Json<GameStartResponse> {
    let game = state.start_game();
    Json(GameStartResponse {
        game_id: game.id,
        hash: game.hash,
    })
}

async fn game_crash(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (crash_multiplier, bets_processed) = state.crash_game(id).await?;
    Ok(Json(json!({
        "crash_multiplier": crash_multiplier,
        "bets_processed": bets_processed,
    })))
}

#[derive(Deserialize)]
struct BetPayload {
    user_id: u64,
    game_id: u64,
    amount: f64,
}

async fn place_bet(
    State(state): State<AppState>,
    Json(payload): Json<BetPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let bet = state
        .place_bet(payload.user_id, payload.game_id, payload.amount)
        .await?;
    Ok(Json(json!({ "bet_id": bet.id, "amount": bet.amount })))
}

#[derive(Deserialize)]
struct CashOutPayload {
    multiplier: f64,
}

async fn bet_cashout(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<CashOutPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let payout = state.cash_out(id, payload.multiplier).await?;
    Ok(Json(json!({ "payout": payout })))
}

#[derive(Deserialize)]
struct VerifyParams {
    seed: String,
    hash: String,
}

async fn verify_round(Query(params): Query<VerifyParams>) -> Json<serde_json::Value> {
    Json(json!({ "valid": round::verify(&params.seed, &params.hash) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_INITIAL_BALANCE;

    fn state() -> AppState {
        AppState::new(MemoryStore::new(), SafetyManager::new(0.1, 500.0))
    }

    #[tokio::test]
    async fn bet_debits_stake_up_front() {
        let state = state();
        let user = state.store.create_user("alice").unwrap();
        let game = state.start_game();

        state.place_bet(user.id, game.id, 50.0).await.unwrap();
        assert_eq!(
            state.store.user(user.id).unwrap().balance,
            DEFAULT_INITIAL_BALANCE - 50.0
        );
    }

    #[tokio::test]
    async fn safety_limit_rejects_oversized_bet() {
        let state = state();
        let user = state.store.create_user("alice").unwrap();
        let game = state.start_game();

        // 0.1 max fraction of 1000.
        let err = state.place_bet(user.id, game.id, 150.0).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cash_out_above_crash_is_rejected() {
        let state = state();
        let user = state.store.create_user("alice").unwrap();
        let game = state.start_game();
        let bet = state.place_bet(user.id, game.id, 10.0).await.unwrap();

        let too_high = game.crash_multiplier + 0.01;
        let err = state.cash_out(bet.id, too_high).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cash_out_credits_amount_times_multiplier() {
        let state = state();
        let user = state.store.create_user("alice").unwrap();
        let game = state.start_game();
        let bet = state.place_bet(user.id, game.id, 10.0).await.unwrap();

        let payout = state.cash_out(bet.id, 1.0).await.unwrap();
        assert_eq!(payout, 10.0);
        assert_eq!(
            state.store.user(user.id).unwrap().balance,
            DEFAULT_INITIAL_BALANCE
        );
        // Settling twice is refused.
        assert!(state.cash_out(bet.id, 1.0).await.is_err());
    }

    #[tokio::test]
    async fn crash_settles_uncashed_bets_as_losses() {
        let state = state();
        let user = state.store.create_user("alice").unwrap();
        let game = state.start_game();
        let bet = state.place_bet(user.id, game.id, 40.0).await.unwrap();

        let (crash, processed) = state.crash_game(game.id).await.unwrap();
        assert_eq!(crash, game.crash_multiplier);
        assert_eq!(processed, 1);

        let settled = state.store.bet(bet.id).unwrap();
        assert_eq!(settled.payout, Some(0.0));
        assert!(settled.cash_out_multiplier.is_none());
        assert_eq!(
            state.store.user(user.id).unwrap().balance,
            DEFAULT_INITIAL_BALANCE - 40.0
        );
    }

    #[tokio::test]
    async fn stored_game_passes_commit_reveal_audit() {
        let state = state();
        let game = state.start_game();
        assert!(round::verify(&game.seed, &game.hash));
        assert_eq!(round::crash_multiplier(&game.hash), game.crash_multiplier);
    }
}
