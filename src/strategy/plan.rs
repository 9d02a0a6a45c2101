use super::{Evaluation, StrategyCategory, StrategyRecord, StrategySet};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt::Write;

const PLAN_TITLE: &str = "Comprehensive Monetization Plan";

/// All strategies ordered by revenue, with the evaluations and rendered markdown
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetizationPlan {
    pub title: String,
    pub strategies: Vec<StrategyRecord>,
    pub ethical_considerations: Vec<String>,
    pub legal_considerations: Vec<String>,
    pub recommendations: Vec<String>,
    /// Contents of `monetization_plan.md`
    pub markdown: String,
}

/// Sort key of a revenue estimate, higher earns more
///
/// Unrecognised estimates rank below `Low`.
pub fn revenue_rank(estimate: &str) -> u8 {
    match estimate.trim() {
        "High" => 5,
        "Medium to High" => 4,
        "Medium" => 3,
        "Low to Medium" => 2,
        "Low" => 1,
        _ => 0,
    }
}

/// Orders every strategy by revenue tier and renders the plan
///
/// The sort is stable, so strategies of one tier keep category order.
pub fn create_monetization_plan(strategies: &StrategySet, ethics: &Evaluation, legal: &Evaluation) -> MonetizationPlan {
    let mut sorted: Vec<StrategyRecord> = strategies.all().cloned().collect();
    sorted.sort_by_key(|s| Reverse(revenue_rank(&s.revenue_estimate)));

    let recommendations: Vec<String> = ethics
        .recommendations
        .iter()
        .chain(legal.recommendations.iter())
        .cloned()
        .collect();

    let mut plan = MonetizationPlan {
        title: PLAN_TITLE.to_string(),
        strategies: sorted,
        ethical_considerations: ethics.considerations.clone(),
        legal_considerations: legal.considerations.clone(),
        recommendations,
        markdown: String::new(),
    };
    plan.markdown = render_plan(&plan);
    plan
}

fn render_plan(plan: &MonetizationPlan) -> String {
    let mut md = format!("# {}\n\n## Ethical and Legal Considerations\n\n", plan.title);

    md.push_str("### Ethical Considerations\n\n");
    for consideration in &plan.ethical_considerations {
        let _ = writeln!(md, "- {}", consideration);
    }
    md.push_str("\n### Legal Considerations\n\n");
    for consideration in &plan.legal_considerations {
        let _ = writeln!(md, "- {}", consideration);
    }
    md.push('\n');

    if !plan.recommendations.is_empty() {
        md.push_str("### Recommendations\n\n");
        for recommendation in &plan.recommendations {
            let _ = writeln!(md, "- {}", recommendation);
        }
        md.push('\n');
    }

    for category in StrategyCategory::ALL {
        let in_category: Vec<&StrategyRecord> = plan
            .strategies
            .iter()
            .filter(|s| s.category == category.key())
            .collect();
        if in_category.is_empty() {
            continue;
        }

        let _ = writeln!(md, "## {} Strategies\n", category.name());
        for (i, strategy) in in_category.iter().enumerate() {
            let _ = writeln!(md, "### Strategy {}: {}\n", i + 1, strategy.title);
            let _ = writeln!(md, "{}\n", strategy.description);

            if !strategy.steps.is_empty() {
                md.push_str("#### Implementation Steps\n\n");
                for (j, step) in strategy.steps.iter().enumerate() {
                    let _ = writeln!(md, "{}. {}", j + 1, step);
                }
                md.push('\n');
            }
            if !strategy.platforms.is_empty() {
                let _ = writeln!(md, "**Platforms**: {}\n", strategy.platforms.join(", "));
            }
            let _ = writeln!(md, "**Estimated Revenue**: {}\n", strategy.revenue_estimate);
            let _ = writeln!(md, "**Time Investment**: {}\n", strategy.time_investment);
        }
    }
    md
}
