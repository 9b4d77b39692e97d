//! Attention snapshots from the upstream attention tracker

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse engagement level reported by the attention tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttentionLevel {
    #[default]
    High,
    Medium,
    Low,
    /// Learner has left the session surface
    Away,
}

impl AttentionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AttentionLevel::High => "high",
            AttentionLevel::Medium => "medium",
            AttentionLevel::Low => "low",
            AttentionLevel::Away => "away",
        }
    }
}

impl fmt::Display for AttentionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttentionLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(AttentionLevel::High),
            "medium" => Ok(AttentionLevel::Medium),
            "low" => Ok(AttentionLevel::Low),
            "away" => Ok(AttentionLevel::Away),
            _ => Err(ParseError::UnknownAttentionLevel(s.to_string())),
        }
    }
}

/// Attention snapshot taken alongside each emotion frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionState {
    pub level: AttentionLevel,

    /// Seconds since the last user input
    #[serde(default, alias = "idleDuration")]
    pub idle_duration_secs: f64,

    /// Whether the learner is actively interacting
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,

    #[serde(default = "default_true", alias = "isLookingAtScreen")]
    pub is_looking_at_screen: bool,

    #[serde(default = "default_true", alias = "isTabFocused")]
    pub is_tab_focused: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AttentionState {
    fn default() -> Self {
        Self {
            level: AttentionLevel::High,
            idle_duration_secs: 0.0,
            is_active: true,
            is_looking_at_screen: true,
            is_tab_focused: true,
        }
    }
}

impl AttentionState {
    /// Engaged learner at the given level
    pub fn at_level(level: AttentionLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Learner away from the session for `idle_secs`
    pub fn away(idle_secs: f64) -> Self {
        Self {
            level: AttentionLevel::Away,
            idle_duration_secs: idle_secs,
            is_active: false,
            is_looking_at_screen: false,
            is_tab_focused: false,
        }
    }

    pub fn is_away(&self) -> bool {
        self.level == AttentionLevel::Away
    }
}
