//! Battle result records
//!
//! Provides:
//! - Saving one report per finished battle
//! - Listing the most recent results
//!
//! Storage failures are returned to the caller and never touch the engine.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::combat::{BattleReport, Outcome};

/// Hero columns available per row
pub const HERO_SLOTS: usize = 4;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("battle is not decided yet")]
    Undecided,

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// A stored battle result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRecord {
    pub id: Uuid,
    pub outcome: Outcome,
    pub boss_name: String,
    pub rounds: u32,
    /// Heroes with their final HP, in party order
    pub heroes: Vec<(String, i32)>,
    pub created_at: DateTime<Utc>,
}

/// Result store backed by SQLite
#[derive(Debug, Clone)]
pub struct ResultStore {
    pool: SqlitePool,
}

impl ResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a finished battle. Returns the new record id.
    pub async fn save(&self, report: &BattleReport) -> Result<Uuid, RecordError> {
        if !report.outcome.is_decided() {
            return Err(RecordError::Undecided);
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let hero = |slot: usize| report.party.get(slot);

        sqlx::query(
            r#"
            INSERT INTO battle_results (
                id, result, boss_name, round_count,
                hero1_name, hero1_hp, hero2_name, hero2_hp,
                hero3_name, hero3_hp, hero4_name, hero4_hp,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(report.outcome.as_str())
        .bind(report.adversary.as_str())
        .bind(report.rounds as i64)
        .bind(hero(0).map(|h| h.0.clone()))
        .bind(hero(0).map(|h| h.1))
        .bind(hero(1).map(|h| h.0.clone()))
        .bind(hero(1).map(|h| h.1))
        .bind(hero(2).map(|h| h.0.clone()))
        .bind(hero(2).map(|h| h.1))
        .bind(hero(3).map(|h| h.0.clone()))
        .bind(hero(3).map(|h| h.1))
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        info!(
            %id,
            result = report.outcome.as_str(),
            boss = %report.adversary,
            rounds = report.rounds,
            "Battle result saved"
        );
        Ok(id)
    }

    /// Most recent results, newest first
    pub async fn recent(&self, limit: u32) -> Result<Vec<BattleRecord>, RecordError> {
        let rows = sqlx::query(
            r#"
            SELECT id, result, boss_name, round_count,
                   hero1_name, hero1_hp, hero2_name, hero2_hp,
                   hero3_name, hero3_hp, hero4_name, hero4_hp,
                   created_at
            FROM battle_results
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(parse_row)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = records.len(), "Loaded battle results");
        Ok(records)
    }

    /// Number of stored results with the given outcome
    pub async fn count(&self, outcome: Outcome) -> Result<i64, RecordError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM battle_results WHERE result = ?")
                .bind(outcome.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

fn parse_row(row: &sqlx::sqlite::SqliteRow) -> Result<BattleRecord, RecordError> {
    let raw_id: String = row.try_get("id")?;
    let corrupt = |reason: String| RecordError::Corrupt {
        id: raw_id.clone(),
        reason,
    };

    let id = Uuid::parse_str(&raw_id).map_err(|e| corrupt(e.to_string()))?;
    let result: String = row.try_get("result")?;
    let outcome = result
        .parse::<Outcome>()
        .map_err(|_| corrupt(format!("unknown result '{}'", result)))?;
    let created: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created)
        .map_err(|e| corrupt(e.to_string()))?
        .with_timezone(&Utc);
    let rounds: i64 = row.try_get("round_count")?;

    let mut heroes = Vec::new();
    for slot in 1..=HERO_SLOTS {
        let name: Option<String> = row.try_get(format!("hero{}_name", slot).as_str())?;
        let hp: Option<i64> = row.try_get(format!("hero{}_hp", slot).as_str())?;
        if let Some(name) = name {
            heroes.push((name, hp.unwrap_or(0) as i32));
        }
    }

    Ok(BattleRecord {
        id,
        outcome,
        boss_name: row.try_get("boss_name")?,
        rounds: rounds.max(0) as u32,
        heroes,
        created_at,
    })
}
