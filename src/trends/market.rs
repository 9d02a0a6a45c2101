use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse high / medium / low rating used across trend analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Below the medium threshold
    Low,
    /// Between the thresholds
    Medium,
    /// Above the high threshold
    High,
}

impl Level {
    /// Rates `value`: strictly above `high` is high, strictly above `medium` is medium
    pub fn from_thresholds(value: f64, high: f64, medium: f64) -> Self {
        if value > high {
            Level::High
        } else if value > medium {
            Level::Medium
        } else {
            Level::Low
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// Name with an initial capital, for headings and tables
    pub fn capitalized(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job market and search interest figures for one technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    /// Open job postings
    pub job_count: u64,
    /// Average yearly salary in USD
    pub average_salary: u64,
    /// Relative search interest, 0 to 100
    pub interest_score: u32,
}

impl MarketData {
    /// Demand growth derived from the job count
    pub fn growth(&self) -> Level {
        Level::from_thresholds(self.job_count as f64, 30_000.0, 15_000.0)
    }
}

/// Source of market figures for technologies
pub trait MarketDataProvider: Send + Sync {
    /// Figures for `technology`, `None` when nothing is known about it
    fn lookup(&self, technology: &str) -> Option<MarketData>;
}

/// Built-in snapshot of job counts, salaries and interest scores
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMarketData;

/// `(key, job_count, average_salary, interest_score)`, in lookup order
const MARKET_TABLE: &[(&str, u64, u64, u32)] = &[
    ("python", 50_000, 120_000, 100),
    ("javascript", 70_000, 110_000, 90),
    ("react", 45_000, 125_000, 85),
    ("angular", 25_000, 115_000, 60),
    ("vue", 15_000, 105_000, 50),
    ("node.js", 30_000, 115_000, 70),
    ("django", 12_000, 115_000, 40),
    ("flask", 8_000, 110_000, 35),
    ("fastapi", 5_000, 120_000, 25),
    ("express", 20_000, 105_000, 45),
    ("tensorflow", 10_000, 140_000, 65),
    ("pytorch", 8_000, 135_000, 55),
    ("docker", 35_000, 125_000, 80),
    ("kubernetes", 25_000, 135_000, 75),
    ("aws", 60_000, 130_000, 95),
    ("azure", 40_000, 125_000, 85),
    ("gcp", 20_000, 135_000, 65),
    ("mongodb", 18_000, 115_000, 55),
    ("postgresql", 22_000, 120_000, 65),
    ("mysql", 28_000, 110_000, 70),
];

/// True when `word` occurs in `haystack` without alphanumeric neighbours
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
    })
}

impl MarketDataProvider for StaticMarketData {
    fn lookup(&self, technology: &str) -> Option<MarketData> {
        let name = technology.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        MARKET_TABLE
            .iter()
            .find(|(key, ..)| *key == name)
            .or_else(|| MARKET_TABLE.iter().find(|(key, ..)| contains_word(&name, key)))
            .map(|&(_, job_count, average_salary, interest_score)| MarketData {
                job_count,
                average_salary,
                interest_score,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("Python", Some(50_000) ; "exact match ignores case")]
    #[test_case("Node.js", Some(30_000) ; "dotted key")]
    #[test_case("AWS Lambda", Some(60_000) ; "key as a word inside the name")]
    #[test_case("Go", None ; "go does not match django")]
    #[test_case("Java", None ; "java does not match javascript")]
    #[test_case("", None ; "empty name")]
    fn test_lookup(technology: &str, jobs: Option<u64>) {
        assert_eq!(StaticMarketData.lookup(technology).map(|m| m.job_count), jobs);
    }

    #[test]
    fn test_growth_thresholds() {
        let data = |job_count| MarketData { job_count, average_salary: 0, interest_score: 0 };
        assert_eq!(data(30_001).growth(), Level::High);
        assert_eq!(data(30_000).growth(), Level::Medium);
        assert_eq!(data(15_000).growth(), Level::Low);
    }
}
