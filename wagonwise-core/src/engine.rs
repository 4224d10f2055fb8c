//! Decision engine: first-match-wins evaluation over [`RULES`] plus the
//! global gold overlay, with an optional diagnostics side-channel.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::RULE_DEFAULT_ID;
use crate::predicates::is_gold_safe;
use crate::recommendation::{Advice, Constraint, Recommendation};
use crate::rules::{RULES, Rule, RuleContext, default_recommendation};
use crate::state::{PlayerState, WagonState};
use crate::thresholds::{Phase, Thresholds};

/// Recommend the next action using the default threshold table.
#[must_use]
pub fn analyze(player: &PlayerState, wagon: &WagonState) -> Advice {
    analyze_with(&Thresholds::DEFAULT, player, wagon)
}

/// Recommend the next action against a custom threshold table.
#[must_use]
pub fn analyze_with(thresholds: &Thresholds, player: &PlayerState, wagon: &WagonState) -> Advice {
    let (player, wagon) = sanitize_inputs(player, wagon);
    let ctx = RuleContext::new(&player, &wagon, thresholds);
    let active = RULES.iter().find(|rule| (rule.predicate)(&ctx));
    let advice = finalize(&ctx, active);
    log::debug!(
        "active rule {} (priority {}, phase {})",
        advice.rule_id,
        advice.recommendation.priority,
        advice.phase
    );
    advice
}

/// Typed or deserialized snapshots bypass `from_record`, so the record
/// invariants are re-applied before any predicate sees them.
fn sanitize_inputs(player: &PlayerState, wagon: &WagonState) -> (PlayerState, WagonState) {
    (player.clone().sanitized(), WagonState::new(wagon.load))
}

fn finalize(ctx: &RuleContext<'_>, active: Option<&Rule>) -> Advice {
    let (rule_id, mut recommendation) = match active {
        Some(rule) => (rule.id, (rule.build)(ctx)),
        None => (RULE_DEFAULT_ID, default_recommendation()),
    };
    apply_gold_overlay(ctx, &mut recommendation);
    Advice {
        rule_id: rule_id.to_string(),
        phase: Phase::for_rank_with(&ctx.thresholds.phases, ctx.player.rank),
        recommendation,
    }
}

/// Unless a rule opted into spending gold, unsafe gold always means HOLD GOLD.
fn apply_gold_overlay(ctx: &RuleContext<'_>, recommendation: &mut Recommendation) {
    if !recommendation.allow_gold_spend && !is_gold_safe(ctx.player, ctx.thresholds) {
        recommendation.constraints.insert(Constraint::HoldGold);
    }
}

/// Normalized inputs the engine saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub rank: u32,
    pub cash: f64,
    pub gold: f64,
    pub roles: BTreeMap<String, f64>,
    pub wagon_load: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub matched: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub rule_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub rule_id: String,
    pub input_snapshot: InputSnapshot,
    /// Every registered rule in order, matched or not.
    pub per_rule_evaluation: Vec<RuleEvaluation>,
    /// Rules evaluated and rejected before the active one.
    pub skipped_rules_with_reasons: Vec<SkippedRule>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(flatten)]
    pub advice: Advice,
    pub diagnostics: Diagnostics,
}

/// [`analyze`] plus a per-rule trace, stamped with the current time.
#[must_use]
pub fn explain(player: &PlayerState, wagon: &WagonState) -> Explanation {
    explain_with(&Thresholds::DEFAULT, player, wagon, Utc::now())
}

/// [`explain`] with a caller-supplied timestamp.
#[must_use]
pub fn explain_at(
    player: &PlayerState,
    wagon: &WagonState,
    timestamp: DateTime<Utc>,
) -> Explanation {
    explain_with(&Thresholds::DEFAULT, player, wagon, timestamp)
}

/// Re-runs the same predicates as [`analyze_with`]; the trace is computed
/// alongside and never feeds back into rule selection.
#[must_use]
pub fn explain_with(
    thresholds: &Thresholds,
    player: &PlayerState,
    wagon: &WagonState,
    timestamp: DateTime<Utc>,
) -> Explanation {
    let advice = analyze_with(thresholds, player, wagon);
    let (player, wagon) = sanitize_inputs(player, wagon);
    let ctx = RuleContext::new(&player, &wagon, thresholds);

    let per_rule_evaluation: Vec<RuleEvaluation> = RULES
        .iter()
        .map(|rule| RuleEvaluation {
            rule_id: rule.id.to_string(),
            matched: (rule.predicate)(&ctx),
            reason: (rule.explain)(&ctx),
        })
        .collect();
    let skipped_rules_with_reasons = per_rule_evaluation
        .iter()
        .take_while(|evaluation| evaluation.rule_id != advice.rule_id)
        .map(|evaluation| SkippedRule {
            rule_id: evaluation.rule_id.clone(),
            reason: evaluation.reason.clone(),
        })
        .collect();

    let diagnostics = Diagnostics {
        rule_id: advice.rule_id.clone(),
        input_snapshot: InputSnapshot {
            rank: player.rank,
            cash: player.cash,
            gold: player.gold,
            roles: player.roles.clone(),
            wagon_load: wagon.load,
        },
        per_rule_evaluation,
        skipped_rules_with_reasons,
        timestamp,
    };
    Explanation { advice, diagnostics }
}
