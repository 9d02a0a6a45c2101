use super::{ContentPopularity, Level, MarketOpportunities, TechnologyTrends};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Headline figures of a trend report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Best-ranked technology, `unknown` when none was analysed
    pub top_technology: String,
    /// Popularity level of the video
    pub content_popularity: String,
    /// Monetization potential of the repository, `unknown` without one
    pub market_fit: String,
}

/// Everything the trend analysis produced for one video
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Local time the report was generated, RFC 3339
    pub timestamp: String,
    pub summary: TrendSummary,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub technology_trends: TechnologyTrends,
    pub content_popularity: ContentPopularity,
    pub market_opportunities: MarketOpportunities,
}

/// Combines the three analyses into insights and recommendations
pub fn generate_trend_report(
    technology_trends: TechnologyTrends,
    content_popularity: ContentPopularity,
    market_opportunities: MarketOpportunities,
) -> TrendReport {
    let top = technology_trends.top_technology.as_ref();
    let fit = market_opportunities.repository_market_fit.as_ref();
    let popularity = content_popularity.popularity_level;

    let mut key_insights = Vec::new();
    if let Some(top) = top {
        key_insights.push(format!(
            "{} has the highest monetization potential with an overall score of {:.2}",
            top.name, top.overall_score
        ));
    }
    key_insights.push(format!(
        "Content has {} popularity with an engagement rate of {}%",
        popularity, content_popularity.metrics.engagement_rate
    ));
    if let Some(fit) = fit {
        key_insights.push(format!(
            "Repository has {} monetization potential as a {} application",
            fit.monetization_potential, fit.application_type
        ));
    }

    let mut recommendations: Vec<String> = market_opportunities
        .emerging_opportunities
        .iter()
        .map(|o| o.recommendation.clone())
        .collect();
    if let Some(fit) = fit {
        recommendations.extend(fit.recommendations.iter().cloned());
    }
    recommendations.push(
        match popularity {
            Level::High => "Leverage high content popularity to maximize monetization potential",
            Level::Medium => "Improve content to increase popularity and monetization potential",
            Level::Low => "Consider focusing on more popular topics to increase monetization potential",
        }
        .to_string(),
    );

    let summary = TrendSummary {
        top_technology: top.map_or_else(|| "unknown".to_string(), |t| t.name.clone()),
        content_popularity: popularity.to_string(),
        market_fit: fit.map_or_else(|| "unknown".to_string(), |f| f.monetization_potential.to_string()),
    };

    TrendReport {
        timestamp: Local::now().to_rfc3339(),
        summary,
        key_insights,
        recommendations,
        technology_trends,
        content_popularity,
        market_opportunities,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bullets(items: impl IntoIterator<Item = String>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `trend_report.md`
pub fn render_trend_markdown(report: &TrendReport) -> String {
    let mut md = String::from("# Trend Analysis Report\n\n## Summary\n\n");
    let _ = writeln!(md, "- **Top Technology**: {}", report.summary.top_technology);
    let _ = writeln!(md, "- **Content Popularity**: {}", capitalize(&report.summary.content_popularity));
    let _ = writeln!(md, "- **Market Fit**: {}\n", capitalize(&report.summary.market_fit));

    let _ = writeln!(md, "## Key Insights\n\n{}\n", bullets(report.key_insights.iter().cloned()));
    let _ = writeln!(md, "## Recommendations\n\n{}\n", bullets(report.recommendations.iter().cloned()));

    md.push_str("## Technology Trends\n\n");
    md.push_str("| Technology | Overall Score | Monetization Potential | Growth Rate |\n");
    md.push_str("|------------|---------------|------------------------|-------------|\n");
    let trends = &report.technology_trends;
    let top_name = trends.top_technology.as_ref().map(|t| t.name.as_str());
    for score in &trends.ranking {
        let potential = if Some(score.technology.as_str()) == top_name {
            trends.top_technology.as_ref().map_or("-", |t| t.monetization_potential.as_str())
        } else {
            Level::from_thresholds(score.overall_score, 7.0, 4.0).as_str()
        };
        let growth = trends
            .job_market
            .get(&score.technology)
            .and_then(|j| j.growth_rate)
            .map_or("unknown", |g| g.as_str());
        let _ = writeln!(
            md,
            "| {} | {:.2} | {} | {} |",
            score.technology, score.overall_score, potential, growth
        );
    }

    md.push_str("\n## Market Opportunities\n\n### Emerging Opportunities\n\n");
    let opportunities = &report.market_opportunities.emerging_opportunities;
    if opportunities.is_empty() {
        md.push_str("No emerging opportunities identified.\n\n");
    } else {
        for o in opportunities {
            let _ = writeln!(md, "- **{}**: {}", o.technology, o.opportunity);
        }
        md.push('\n');
    }

    if let Some(fit) = &report.market_opportunities.repository_market_fit {
        md.push_str("### Repository Market Fit\n\n");
        let _ = writeln!(md, "- **Repository**: {}", fit.repository);
        let _ = writeln!(md, "- **Application Type**: {}", fit.application_type);
        let _ = writeln!(md, "- **Monetization Potential**: {}", fit.monetization_potential.capitalized());
        let _ = writeln!(md, "- **Market Gap**: {}\n", capitalize(fit.market_gap.as_str()));
    }

    let metrics = &report.content_popularity.metrics;
    md.push_str("## Content Popularity\n\n");
    let _ = writeln!(md, "- **View Count**: {}", metrics.view_count);
    let _ = writeln!(md, "- **Like Count**: {}", metrics.like_count);
    let _ = writeln!(md, "- **Comment Count**: {}", metrics.comment_count);
    let _ = writeln!(md, "- **Engagement Rate**: {}%", metrics.engagement_rate);
    let _ = writeln!(
        md,
        "- **Popularity Level**: {}",
        report.content_popularity.popularity_level.capitalized()
    );
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::youtube::VideoRecord;
    use crate::trends::TrendAnalyzer;

    #[tokio::test]
    async fn test_report_without_repository() {
        let analyzer = TrendAnalyzer::offline();
        let techs = vec!["Python".to_string(), "AWS".to_string()];
        let video = VideoRecord { view_count: 1000, like_count: 30, comment_count: 0, ..VideoRecord::default() };

        let report = generate_trend_report(
            analyzer.analyze_technology_trends(&techs).await,
            analyzer.analyze_content_popularity(&video),
            analyzer.analyze_market_opportunities(&techs, None).await,
        );

        assert_eq!(report.summary.top_technology, "AWS");
        assert_eq!(report.summary.content_popularity, "medium");
        assert_eq!(report.summary.market_fit, "unknown");
        assert_eq!(
            report.key_insights[0],
            "AWS has the highest monetization potential with an overall score of 4.42"
        );
        assert_eq!(
            report.recommendations.last().map(String::as_str),
            Some("Improve content to increase popularity and monetization potential")
        );

        let md = render_trend_markdown(&report);
        assert!(md.starts_with("# Trend Analysis Report\n\n## Summary\n\n- **Top Technology**: AWS"));
        assert!(md.contains("- **Content Popularity**: Medium"));
        assert!(md.contains("| AWS | 4.42 | medium | high |"));
        assert!(md.contains("- **Python**: Rapidly growing demand for Python solutions"));
        assert!(!md.contains("### Repository Market Fit"));
        assert!(md.contains("- **Engagement Rate**: 3%"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("saturated"), "Saturated");
        assert_eq!(capitalize(""), "");
    }
}
