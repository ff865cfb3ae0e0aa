//! Battle log
//!
//! Structured events appended by the battle as it runs. Display and logging
//! collaborators read them; the CLI writes them out as JSON lines.

use serde::Serialize;

use super::actions::ActionOutcome;
use super::effects::EffectType;
use super::policy::Phase;
use super::roster::UnitId;
use super::state::Outcome;

/// Maximum number of party members recorded in a report
pub const REPORT_PARTY_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
    },
    EffectTicked {
        unit: UnitId,
        effect: EffectType,
        amount: i32,
    },
    EffectExpired {
        unit: UnitId,
        effect: EffectType,
    },
    /// A stunned participant lost their turn
    TurnSkipped {
        unit: UnitId,
    },
    ActionResolved {
        outcome: ActionOutcome,
    },
    PhaseChanged {
        phase: Phase,
        power: i32,
    },
    BattleDecided {
        outcome: Outcome,
        round: u32,
    },
}

impl BattleEvent {
    /// Serialize as a single JSON line
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Final result of a finished battle, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    pub outcome: Outcome,
    pub adversary: String,
    pub rounds: u32,
    /// First party members with their final HP
    pub party: Vec<(String, i32)>,
}
