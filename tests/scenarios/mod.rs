//! Scenario tests
//!
//! - Rounds: turn order, stun skips, rejected submissions
//! - Effects: poison expiry, latched outcomes, phase changes
//! - Actions: resource gating and item use mid-battle
//! - Persistence: saving finished battles

pub mod actions;
pub mod effects;
pub mod persistence;
pub mod rounds;
