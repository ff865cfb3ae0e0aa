//! Saving finished battles and reading them back

use bossfight::combat::Outcome;
use bossfight::db::Database;
use bossfight::records::{RecordError, ResultStore};

use crate::harness::BattleTest;

#[tokio::test]
async fn test_finished_battle_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");
    let path = path.to_str().unwrap();

    let mut test = BattleTest::standard(4242);
    let outcome = test.play_out(500);
    assert!(outcome.is_decided());
    let report = test.battle.take_report().unwrap();

    let id = {
        let db = Database::new(Some(path)).await.unwrap();
        let store = ResultStore::new(db.pool().clone());
        let id = store.save(&report).await.unwrap();
        db.pool().close().await;
        id
    };

    let db = Database::new(Some(path)).await.unwrap();
    let store = ResultStore::new(db.pool().clone());
    let records = store.recent(10).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, id);
    assert_eq!(record.outcome, outcome);
    assert_eq!(record.boss_name, "Dragon");
    assert_eq!(record.rounds, report.rounds);
    assert_eq!(record.heroes, report.party);
    assert_eq!(store.count(outcome).await.unwrap(), 1);
}

#[tokio::test]
async fn test_several_battles_listed_newest_first() {
    let db = Database::new(None).await.unwrap();
    let store = ResultStore::new(db.pool().clone());

    let mut ids = Vec::new();
    for seed in 0..3 {
        let mut test = BattleTest::standard(seed);
        test.play_out(500);
        let report = test.battle.take_report().unwrap();
        ids.push(store.save(&report).await.unwrap());
    }

    let records = store.recent(2).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, ids[2]);
    assert_eq!(records[1].id, ids[1]);

    let victories = store.count(Outcome::PartyVictory).await.unwrap();
    let defeats = store.count(Outcome::PartyDefeat).await.unwrap();
    assert_eq!(victories + defeats, 3);
}

#[tokio::test]
async fn test_undecided_report_refused() {
    let db = Database::new(None).await.unwrap();
    let store = ResultStore::new(db.pool().clone());

    let mut test = BattleTest::standard(5);
    test.expect_turn();
    assert!(test.battle.take_report().is_none());

    let report = bossfight::combat::BattleReport {
        outcome: Outcome::Undecided,
        adversary: "Dragon".to_string(),
        rounds: 1,
        party: Vec::new(),
    };
    assert!(matches!(store.save(&report).await, Err(RecordError::Undecided)));
    assert!(store.recent(5).await.unwrap().is_empty());
}
