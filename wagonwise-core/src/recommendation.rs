//! Recommendation payloads produced by the decision engine.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::thresholds::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Spending restriction attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Constraint {
    #[serde(rename = "HOLD GOLD")]
    HoldGold,
    #[serde(rename = "NO COSMETICS")]
    NoCosmetics,
    #[serde(rename = "BUY NATURALIST")]
    BuyNaturalist,
}

impl Constraint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HoldGold => "HOLD GOLD",
            Self::NoCosmetics => "NO COSMETICS",
            Self::BuyNaturalist => "BUY NATURALIST",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAction {
    pub icon: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

impl PrimaryAction {
    #[must_use]
    pub fn new(icon: &str, text: impl Into<String>) -> Self {
        Self {
            icon: icon.to_string(),
            text: text.into(),
            subtext: None,
            impact: None,
        }
    }

    #[must_use]
    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }

    #[must_use]
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryAction {
    pub text: String,
}

/// A prioritized suggested action plus spending constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub primary_action: PrimaryAction,
    #[serde(default)]
    pub secondary_action: Option<SecondaryAction>,
    #[serde(default)]
    pub constraints: BTreeSet<Constraint>,
    #[serde(default)]
    pub allow_gold_spend: bool,
}

impl Recommendation {
    #[must_use]
    pub fn new(priority: Priority, primary_action: PrimaryAction) -> Self {
        Self {
            priority,
            primary_action,
            secondary_action: None,
            constraints: BTreeSet::new(),
            allow_gold_spend: false,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, text: impl Into<String>) -> Self {
        self.secondary_action = Some(SecondaryAction { text: text.into() });
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.insert(constraint);
        self
    }

    #[must_use]
    pub const fn allowing_gold_spend(mut self) -> Self {
        self.allow_gold_spend = true;
        self
    }

    #[must_use]
    pub fn has_constraint(&self, constraint: Constraint) -> bool {
        self.constraints.contains(&constraint)
    }
}

/// Engine output: the active rule, the player's phase, and the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub rule_id: String,
    pub phase: Phase,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}
