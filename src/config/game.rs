/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as the escalation
/// grace delay, the post-turn hold delays, and the command authority's
/// default probabilities.
pub const GRACE_DELAY: u64 = 4; // Seconds before an unanswered command escalates, and again before it expires.

/// Duration (in milliseconds) a resolved turn stays on screen before the next command is issued.
pub const HOLD_DELAY_MS: u64 = 1500;

/// Duration (in seconds) a trap message stays on screen before play resumes.
pub const TRAP_RECOVERY_DELAY: u64 = 3;

/// Default probability that an issued command is NOT authorized.
pub const UNAUTHORIZED_CHANCE: f64 = 0.30;

/// Among unauthorized commands, probability of carrying fake authorization
/// markers from the impostor voice (TwoVoices mode only).
pub const DECOY_VOICE_CHANCE: f64 = 0.35;

/// Maximum back-to-back unauthorized commands before one is forced authorized.
pub const MAX_CONSECUTIVE_DECOYS: u32 = 2;

/// Decoy direction mixture weights: repeat the correct move, pick another
/// legal move, or pick any direction at random.
pub const DECOY_TEMPT_WEIGHT: u32 = 4;
pub const DECOY_SIDESTEP_WEIGHT: u32 = 3;
pub const DECOY_WILD_WEIGHT: u32 = 3;
