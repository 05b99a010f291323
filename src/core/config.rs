use serde::{Deserialize, Serialize};
use crate::core::error::{Error, Result};
use crate::search::fuzzy::MAX_EDIT_DISTANCE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Search pagination
    pub default_limit: usize,
    pub max_limit: usize,

    // Suggestions
    pub default_suggestion_limit: usize,
    pub max_suggestion_limit: usize,
    pub default_fuzzy_max_edits: u8,
    pub max_fuzzy_edits: u8,
    pub min_vocabulary_term_len: usize,
    pub max_recent_queries_per_user: usize,

    // Analytics
    pub max_analytics_events: usize,
    pub top_queries_limit: usize,

    // Highlighting
    pub highlight_pre_tag: String,
    pub highlight_post_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_limit: 20,
            max_limit: 1000,

            default_suggestion_limit: 10,
            max_suggestion_limit: 50,
            default_fuzzy_max_edits: 2,
            max_fuzzy_edits: 3,
            min_vocabulary_term_len: 2,
            max_recent_queries_per_user: 100,

            max_analytics_events: 100_000,
            top_queries_limit: 20,

            highlight_pre_tag: "<em>".to_string(),
            highlight_post_tag: "</em>".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Parse a JSON configuration document; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let caps = [
            ("default_limit", self.default_limit),
            ("max_limit", self.max_limit),
            ("default_suggestion_limit", self.default_suggestion_limit),
            ("max_suggestion_limit", self.max_suggestion_limit),
            ("max_recent_queries_per_user", self.max_recent_queries_per_user),
            ("max_analytics_events", self.max_analytics_events),
            ("top_queries_limit", self.top_queries_limit),
        ];
        for (name, value) in caps {
            if value == 0 {
                return Err(Error::invalid_input(format!("{} must be greater than 0", name)));
            }
        }
        if self.default_limit > self.max_limit {
            return Err(Error::invalid_input("default_limit exceeds max_limit"));
        }
        if self.default_suggestion_limit > self.max_suggestion_limit {
            return Err(Error::invalid_input(
                "default_suggestion_limit exceeds max_suggestion_limit",
            ));
        }
        if self.max_fuzzy_edits == 0 || self.max_fuzzy_edits > MAX_EDIT_DISTANCE {
            return Err(Error::invalid_input(format!(
                "max_fuzzy_edits must be within 1..={}, got {}",
                MAX_EDIT_DISTANCE, self.max_fuzzy_edits
            )));
        }
        if self.default_fuzzy_max_edits == 0 || self.default_fuzzy_max_edits > self.max_fuzzy_edits {
            return Err(Error::invalid_input(format!(
                "default_fuzzy_max_edits must be within 1..={}",
                self.max_fuzzy_edits
            )));
        }
        Ok(())
    }
}

/// Builder for Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn max_limit(mut self, limit: usize) -> Self {
        self.config.max_limit = limit;
        self
    }

    pub fn default_suggestion_limit(mut self, limit: usize) -> Self {
        self.config.default_suggestion_limit = limit;
        self
    }

    pub fn default_fuzzy_max_edits(mut self, edits: u8) -> Self {
        self.config.default_fuzzy_max_edits = edits;
        self
    }

    pub fn max_recent_queries_per_user(mut self, cap: usize) -> Self {
        self.config.max_recent_queries_per_user = cap;
        self
    }

    pub fn max_analytics_events(mut self, cap: usize) -> Self {
        self.config.max_analytics_events = cap;
        self
    }

    pub fn top_queries_limit(mut self, limit: usize) -> Self {
        self.config.top_queries_limit = limit;
        self
    }

    pub fn highlight_tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.config.highlight_pre_tag = pre.into();
        self.config.highlight_post_tag = post.into();
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
