use serde::{Deserialize, Serialize};

/// Environment variables the video and channel pipelines refuse to run without
pub const REQUIRED_ENV_VARS: &[(&str, &str)] = &[
    ("YOUTUBE_API_KEY", "YouTube Data API v3 key for video and channel metadata"),
    ("GITHUB_TOKEN", "GitHub token for repository metadata, languages and READMEs"),
    ("OPENAI_API_KEY", "OpenAI key for transcript summaries"),
];

/// Stores API keys for the external services
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeys {
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
}

impl ApiKeys {
    /// Reads every key from the process environment
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: get_env_value("YOUTUBE_API_KEY"),
            github_token: get_env_value("GITHUB_TOKEN"),
            openai_api_key: get_env_value("OPENAI_API_KEY"),
        }
    }

    /// Fills keys absent from a config file with values from the environment
    pub fn merge_env(&mut self) {
        let env = Self::from_env();
        if self.youtube_api_key.is_none() {
            self.youtube_api_key = env.youtube_api_key;
        }
        if self.github_token.is_none() {
            self.github_token = env.github_token;
        }
        if self.openai_api_key.is_none() {
            self.openai_api_key = env.openai_api_key;
        }
    }

    /// Names of required variables that are unset or empty, in declaration order
    pub fn missing(&self) -> Vec<&'static str> {
        REQUIRED_ENV_VARS
            .iter()
            .filter(|(name, _)| self.value_for(name).map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect()
    }

    fn value_for(&self, name: &str) -> Option<&str> {
        match name {
            "YOUTUBE_API_KEY" => self.youtube_api_key.as_deref(),
            "GITHUB_TOKEN" => self.github_token.as_deref(),
            "OPENAI_API_KEY" => self.openai_api_key.as_deref(),
            _ => None,
        }
    }
}

/// Reads an environment variable, treating an empty value as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_reports_unset_and_blank_keys() {
        let keys = ApiKeys {
            youtube_api_key: Some("yt".into()),
            github_token: Some("   ".into()),
            openai_api_key: None,
        };
        assert_eq!(keys.missing(), vec!["GITHUB_TOKEN", "OPENAI_API_KEY"]);
    }

    #[test]
    fn test_missing_is_empty_when_all_present() {
        let keys = ApiKeys {
            youtube_api_key: Some("yt".into()),
            github_token: Some("gh".into()),
            openai_api_key: Some("sk".into()),
        };
        assert!(keys.missing().is_empty());
    }
}
