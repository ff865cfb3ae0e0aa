//! Fixtures for tests that touch the results table

use crate::combat::{BattleReport, Outcome};
use crate::records::ResultStore;

use super::Database;

/// A result store on a fresh in-memory database, migrations applied
pub async fn test_store() -> ResultStore {
    let db = Database::new(None)
        .await
        .expect("Failed to create test database");
    ResultStore::new(db.pool().clone())
}

/// A report against "Dragon" with `heroes` members named Hero1.. at 0, 10, 20.. HP
pub fn sample_report(outcome: Outcome, rounds: u32, heroes: usize) -> BattleReport {
    BattleReport {
        outcome,
        adversary: "Dragon".to_string(),
        rounds,
        party: (0..heroes)
            .map(|i| (format!("Hero{}", i + 1), 10 * i as i32))
            .collect(),
    }
}
