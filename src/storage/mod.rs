//! In-memory repository over plain value records.
//!
//! The simulation core never touches this layer; it exists for the HTTP
//! service, which records users, games and bets by integer id. Durability is
//! explicitly out of scope, so the tables live in concurrent maps for the
//! lifetime of the process.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_INITIAL_BALANCE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    pub seed: String,
    pub hash: String,
    pub crash_multiplier: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: u64,
    pub user_id: u64,
    pub game_id: u64,
    pub amount: f64,
    /// None until the user cashes out; stays None on a crash loss.
    pub cash_out_multiplier: Option<f64>,
    pub payout: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    UserNotFound(u64),
    #[error("game {0} not found")]
    GameNotFound(u64),
    #[error("bet {0} not found")]
    BetNotFound(u64),
    #[error("username '{0}' already taken")]
    DuplicateUsername(String),
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: f64, need: f64 },
}

/// Process-lifetime store with atomic id allocation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<u64, User>,
    games: DashMap<u64, Game>,
    bets: DashMap<u64, Bet>,
    next_user_id: AtomicU64,
    next_game_id: AtomicU64,
    next_bet_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&self, username: &str) -> Result<User, StoreError> {
        if self.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }
        let id = self.next_user_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User {
            id,
            username: username.to_string(),
            balance: DEFAULT_INITIAL_BALANCE,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: u64) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .map(|u| u.clone())
            .ok_or(StoreError::UserNotFound(id))
    }

    /// Take `amount` from the user's balance, failing before any mutation if
    /// the funds are not there.
    pub fn debit_user(&self, id: u64, amount: f64) -> Result<(), StoreError> {
        let mut user = self.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        if user.balance < amount {
            return Err(StoreError::InsufficientBalance {
                have: user.balance,
                need: amount,
            });
        }
        user.balance -= amount;
        Ok(())
    }

    pub fn credit_user(&self, id: u64, amount: f64) -> Result<(), StoreError> {
        let mut user = self.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        user.balance += amount;
        Ok(())
    }

    pub fn insert_game(&self, seed: String, hash: String, crash_multiplier: f64) -> Game {
        let id = self.next_game_id.fetch_add(1, Ordering::Relaxed) + 1;
        let game = Game {
            id,
            seed,
            hash,
            crash_multiplier,
            created_at: Utc::now(),
        };
        self.games.insert(id, game.clone());
        game
    }

    pub fn game(&self, id: u64) -> Result<Game, StoreError> {
        self.games
            .get(&id)
            .map(|g| g.clone())
            .ok_or(StoreError::GameNotFound(id))
    }

    pub fn insert_bet(&self, user_id: u64, game_id: u64, amount: f64) -> Result<Bet, StoreError> {
        if !self.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }
        if !self.games.contains_key(&game_id) {
            return Err(StoreError::GameNotFound(game_id));
        }
        let id = self.next_bet_id.fetch_add(1, Ordering::Relaxed) + 1;
        let bet = Bet {
            id,
            user_id,
            game_id,
            amount,
            cash_out_multiplier: None,
            payout: None,
            created_at: Utc::now(),
        };
        self.bets.insert(id, bet.clone());
        Ok(bet)
    }

    pub fn bet(&self, id: u64) -> Result<Bet, StoreError> {
        self.bets
            .get(&id)
            .map(|b| b.clone())
            .ok_or(StoreError::BetNotFound(id))
    }

    pub fn bets_for_game(&self, game_id: u64) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self
            .bets
            .iter()
            .filter(|b| b.game_id == game_id)
            .map(|b| b.clone())
            .collect();
        bets.sort_by_key(|b| b.id);
        bets
    }

    /// Record a bet's resolution: cash-out multiplier (if any) and payout.
    pub fn settle_bet(
        &self,
        id: u64,
        cash_out_multiplier: Option<f64>,
        payout: f64,
    ) -> Result<Bet, StoreError> {
        let mut bet = self.bets.get_mut(&id).ok_or(StoreError::BetNotFound(id))?;
        bet.cash_out_multiplier = cash_out_multiplier;
        bet.payout = Some(payout);
        Ok(bet.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_get_sequential_ids_and_starting_balance() {
        let store = MemoryStore::new();
        let a = store.create_user("alice").unwrap();
        let b = store.create_user("bob").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.balance, DEFAULT_INITIAL_BALANCE);
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let store = MemoryStore::new();
        store.create_user("alice").unwrap();
        assert!(matches!(
            store.create_user("alice"),
            Err(StoreError::DuplicateUsername(_))
        ));
    }

    #[test]
    fn debit_fails_without_funds_and_leaves_balance_untouched() {
        let store = MemoryStore::new();
        let user = store.create_user("alice").unwrap();
        let err = store.debit_user(user.id, DEFAULT_INITIAL_BALANCE + 1.0);
        assert!(matches!(err, Err(StoreError::InsufficientBalance { .. })));
        assert_eq!(store.user(user.id).unwrap().balance, DEFAULT_INITIAL_BALANCE);
    }

    #[test]
    fn bet_lifecycle_places_and_settles() {
        let store = MemoryStore::new();
        let user = store.create_user("alice").unwrap();
        let game = store.insert_game("seed".into(), "hash".into(), 2.5);

        let bet = store.insert_bet(user.id, game.id, 50.0).unwrap();
        assert!(bet.payout.is_none());

        let settled = store.settle_bet(bet.id, Some(1.8), 90.0).unwrap();
        assert_eq!(settled.cash_out_multiplier, Some(1.8));
        assert_eq!(settled.payout, Some(90.0));
    }

    #[test]
    fn bets_for_game_are_ordered_and_scoped() {
        let store = MemoryStore::new();
        let user = store.create_user("alice").unwrap();
        let g1 = store.insert_game("s1".into(), "h1".into(), 2.0);
        let g2 = store.insert_game("s2".into(), "h2".into(), 3.0);

        store.insert_bet(user.id, g1.id, 10.0).unwrap();
        store.insert_bet(user.id, g2.id, 20.0).unwrap();
        store.insert_bet(user.id, g1.id, 30.0).unwrap();

        let bets = store.bets_for_game(g1.id);
        assert_eq!(bets.len(), 2);
        assert!(bets[0].id < bets[1].id);
    }

    #[test]
    fn unknown_ids_surface_typed_errors() {
        let store = MemoryStore::new();
        assert!(matches!(store.user(7), Err(StoreError::UserNotFound(7))));
        assert!(matches!(store.game(7), Err(StoreError::GameNotFound(7))));
        assert!(matches!(store.bet(7), Err(StoreError::BetNotFound(7))));
        assert!(store.insert_bet(1, 1, 5.0).is_err());
    }
}
