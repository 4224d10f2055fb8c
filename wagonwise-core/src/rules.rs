//! Ordered advisory rule registry.
//!
//! Declaration order is the priority policy: the engine walks [`RULES`] top
//! to bottom and the first matching predicate wins. Moving an entry changes
//! behavior.
use crate::constants::RULE_DEFAULT_ID;
use crate::numbers::{ceil_f64_to_u32, floor_f64_to_u32};
use crate::predicates::{
    can_afford_naturalist, has_bounty, has_collector, has_naturalist, has_trader,
    is_before_mid_phase, is_cash_poor, is_gold_critical, is_wagon_empty, is_wagon_full,
    is_wagon_near_full,
};
use crate::recommendation::{Constraint, PrimaryAction, Priority, Recommendation};
use crate::state::{PlayerState, WagonState};
use crate::thresholds::Thresholds;

/// Inputs every rule callback sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub player: &'a PlayerState,
    pub wagon: &'a WagonState,
    pub thresholds: &'a Thresholds,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub const fn new(
        player: &'a PlayerState,
        wagon: &'a WagonState,
        thresholds: &'a Thresholds,
    ) -> Self {
        Self {
            player,
            wagon,
            thresholds,
        }
    }
}

/// A prioritized (predicate, explanation, builder) record.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub predicate: fn(&RuleContext<'_>) -> bool,
    /// Human-readable reason; diagnostics only, never consulted for control flow.
    pub explain: fn(&RuleContext<'_>) -> String,
    pub build: fn(&RuleContext<'_>) -> Recommendation,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish_non_exhaustive()
    }
}

pub static RULES: &[Rule] = &[
    Rule {
        id: "trader_sale",
        predicate: trader_sale_applies,
        explain: explain_trader_sale,
        build: build_trader_sale,
    },
    Rule {
        id: "naturalist_unlock",
        predicate: naturalist_unlock_applies,
        explain: explain_naturalist,
        build: build_naturalist_unlock,
    },
    Rule {
        id: "naturalist_gold_shortfall",
        predicate: naturalist_shortfall_applies,
        explain: explain_naturalist,
        build: build_naturalist_shortfall,
    },
    Rule {
        id: "gold_critical",
        predicate: gold_critical_applies,
        explain: explain_gold_critical,
        build: build_gold_critical,
    },
    Rule {
        id: "trader_resupply",
        predicate: trader_resupply_applies,
        explain: explain_trader_resupply,
        build: build_trader_resupply,
    },
    Rule {
        id: "trader_prepare_sale",
        predicate: trader_prepare_sale_applies,
        explain: explain_trader_prepare_sale,
        build: build_trader_prepare_sale,
    },
    Rule {
        id: "collector_early_cash",
        predicate: collector_early_cash_applies,
        explain: explain_collector_early_cash,
        build: build_collector_early_cash,
    },
    Rule {
        id: "collector_full_route",
        predicate: collector_full_route_applies,
        explain: explain_collector_full_route,
        build: build_collector_full_route,
    },
];

/// Rule ids in evaluation order, followed by the default id.
#[must_use]
pub fn rule_ids() -> Vec<&'static str> {
    RULES
        .iter()
        .map(|rule| rule.id)
        .chain(std::iter::once(RULE_DEFAULT_ID))
        .collect()
}

/// Used when no rule matches.
#[must_use]
pub fn default_recommendation() -> Recommendation {
    Recommendation::new(
        Priority::Medium,
        PrimaryAction::new("📅", "Keep your daily challenge streak alive")
            .with_subtext("Nothing urgent: dailies are steady gold and streak bonuses"),
    )
    .with_secondary("Check this week's bonuses before picking a role")
}

fn sale_value(ctx: &RuleContext<'_>) -> u32 {
    floor_f64_to_u32(ctx.thresholds.wagon_sale_value * ctx.wagon.load / 100.0)
}

// trader_sale ---------------------------------------------------------------

fn trader_sale_applies(ctx: &RuleContext<'_>) -> bool {
    has_trader(ctx.player) && is_wagon_full(ctx.wagon, ctx.thresholds)
}

fn explain_trader_sale(ctx: &RuleContext<'_>) -> String {
    format!(
        "trader owned: {}; wagon {:.0}% against full cutoff {:.0}%",
        has_trader(ctx.player),
        ctx.wagon.load,
        ctx.thresholds.wagon_full
    )
}

fn build_trader_sale(ctx: &RuleContext<'_>) -> Recommendation {
    let secondary = if is_gold_critical(ctx.player, ctx.thresholds) {
        "Hold your gold after selling: it is below the critical floor"
    } else {
        "Resupply materials immediately after the sale"
    };
    Recommendation::new(
        Priority::Critical,
        PrimaryAction::new("🛒", "Sell your trader wagon now")
            .with_subtext(format!(
                "Wagon at {:.0}%: production stalls at capacity",
                ctx.wagon.load
            ))
            .with_impact(format!("+${}", sale_value(ctx))),
    )
    .with_secondary(secondary)
}

// naturalist ----------------------------------------------------------------

fn naturalist_unlock_applies(ctx: &RuleContext<'_>) -> bool {
    !has_naturalist(ctx.player) && can_afford_naturalist(ctx.player, ctx.thresholds)
}

fn naturalist_shortfall_applies(ctx: &RuleContext<'_>) -> bool {
    !has_naturalist(ctx.player) && !can_afford_naturalist(ctx.player, ctx.thresholds)
}

fn explain_naturalist(ctx: &RuleContext<'_>) -> String {
    format!(
        "naturalist owned: {}; gold {:.1} against unlock cost {:.0}",
        has_naturalist(ctx.player),
        ctx.player.gold,
        ctx.thresholds.naturalist_unlock_gold
    )
}

fn build_naturalist_unlock(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::High,
        PrimaryAction::new("🌿", "Buy the Naturalist role now").with_subtext(format!(
            "{:.1} gold covers the {:.0} gold unlock",
            ctx.player.gold, ctx.thresholds.naturalist_unlock_gold
        )),
    )
    .with_secondary("Start sampling animals right after the unlock")
    .with_constraint(Constraint::BuyNaturalist)
    .allowing_gold_spend()
}

fn build_naturalist_shortfall(ctx: &RuleContext<'_>) -> Recommendation {
    let shortfall = ceil_f64_to_u32(ctx.thresholds.naturalist_unlock_gold - ctx.player.gold);
    let subtext = if has_bounty(ctx.player) {
        "Bounties are your fastest gold: run them back to back"
    } else {
        "Daily challenges and treasure maps pay gold without a role"
    };
    Recommendation::new(
        Priority::High,
        PrimaryAction::new("🌿", format!("Farm {shortfall} more gold for the Naturalist"))
            .with_subtext(subtext),
    )
    .with_secondary("Skip every other gold purchase until the unlock")
    .with_constraint(Constraint::HoldGold)
}

// gold_critical -------------------------------------------------------------

fn gold_critical_applies(ctx: &RuleContext<'_>) -> bool {
    is_gold_critical(ctx.player, ctx.thresholds)
}

fn explain_gold_critical(ctx: &RuleContext<'_>) -> String {
    format!(
        "gold {:.1} against critical floor {:.0}",
        ctx.player.gold, ctx.thresholds.gold_critical
    )
}

fn build_gold_critical(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::High,
        PrimaryAction::new("🎯", "Run bounties for gold").with_subtext(format!(
            "Only {:.1} gold left, below the {:.0} gold floor",
            ctx.player.gold, ctx.thresholds.gold_critical
        )),
    )
    .with_secondary("Finish daily challenges to keep the streak multiplier")
    .with_constraint(Constraint::NoCosmetics)
    .with_constraint(Constraint::HoldGold)
}

// trader_resupply -----------------------------------------------------------

fn trader_resupply_applies(ctx: &RuleContext<'_>) -> bool {
    has_trader(ctx.player) && is_wagon_empty(ctx.wagon, ctx.thresholds)
}

fn explain_trader_resupply(ctx: &RuleContext<'_>) -> String {
    format!(
        "trader owned: {}; wagon {:.0}% against empty cutoff {:.0}%",
        has_trader(ctx.player),
        ctx.wagon.load,
        ctx.thresholds.wagon_empty
    )
}

fn build_trader_resupply(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::High,
        PrimaryAction::new("📦", "Resupply trader materials").with_subtext(format!(
            "Wagon at {:.0}%: hunt or buy supplies to restart production",
            ctx.wagon.load
        )),
    )
    .with_secondary("Deliver large carcasses at camp for the biggest material boost")
}

// trader_prepare_sale -------------------------------------------------------

// Not narrowed to below the full cutoff: trader_sale sits earlier in RULES.
fn trader_prepare_sale_applies(ctx: &RuleContext<'_>) -> bool {
    has_trader(ctx.player) && is_wagon_near_full(ctx.wagon, ctx.thresholds)
}

fn explain_trader_prepare_sale(ctx: &RuleContext<'_>) -> String {
    format!(
        "trader owned: {}; wagon {:.0}% against near-full cutoff {:.0}%",
        has_trader(ctx.player),
        ctx.wagon.load,
        ctx.thresholds.wagon_near_full
    )
}

fn build_trader_prepare_sale(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::High,
        PrimaryAction::new("🐴", "Prepare a trader sale")
            .with_subtext(format!("Wagon at {:.0}% and filling", ctx.wagon.load))
            .with_impact(format!("${}", sale_value(ctx))),
    )
    .with_secondary("Plan a distant delivery for the larger payout")
}

// collector -----------------------------------------------------------------

fn collector_early_cash_applies(ctx: &RuleContext<'_>) -> bool {
    is_cash_poor(ctx.player, ctx.thresholds) && is_before_mid_phase(ctx.player, ctx.thresholds)
}

fn explain_collector_early_cash(ctx: &RuleContext<'_>) -> String {
    format!(
        "cash ${:.0} against poor cutoff ${:.0}; rank {} against mid phase start {}",
        ctx.player.cash,
        ctx.thresholds.cash_poor,
        ctx.player.rank,
        ctx.thresholds.phases.mid_start
    )
}

fn build_collector_early_cash(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::Medium,
        PrimaryAction::new("🗺️", "Run a collector cash cycle").with_subtext(format!(
            "${:.0} on hand, below the ${:.0} comfort line",
            ctx.player.cash, ctx.thresholds.cash_poor
        )),
    )
    .with_secondary("Sell complete sets to Madam Nazar rather than single items")
}

fn collector_full_route_applies(ctx: &RuleContext<'_>) -> bool {
    is_cash_poor(ctx.player, ctx.thresholds) && has_collector(ctx.player)
}

fn explain_collector_full_route(ctx: &RuleContext<'_>) -> String {
    format!(
        "cash ${:.0} against poor cutoff ${:.0}; collector owned: {}",
        ctx.player.cash,
        ctx.thresholds.cash_poor,
        has_collector(ctx.player)
    )
}

fn build_collector_full_route(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::new(
        Priority::Medium,
        PrimaryAction::new("🗺️", "Run a full collector route").with_subtext(format!(
            "${:.0} on hand: a full route restores a cash buffer",
            ctx.player.cash
        )),
    )
    .with_secondary("Use the daily map refresh before starting the route")
}
