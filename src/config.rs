use std::time::Duration;

use chatgpt::config::ChatGPTEngine;

use crate::error::ConfigError;

const API_KEY_VAR: &str = "CHATGPT_API_KEY";
const ENGINE_VAR: &str = "QUIZ_MODEL_ENGINE";
const TIMEOUT_VAR: &str = "QUIZ_MODEL_TIMEOUT_SECS";
const TEMPERATURE_VAR: &str = "QUIZ_MODEL_TEMPERATURE";
const CONCURRENCY_VAR: &str = "QUIZ_MAX_CONCURRENT_GENERATIONS";

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub engine: ChatGPTEngine,
    pub timeout: Duration,
    /// Sampling temperature, always above zero so repeated requests vary.
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    /// Upper bound on model requests in flight across all chats.
    pub max_concurrent_generations: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let engine = match lookup(ENGINE_VAR) {
            None => ChatGPTEngine::Gpt35Turbo,
            Some(value) => parse_engine(&value).ok_or(ConfigError::Invalid {
                var: ENGINE_VAR,
                value,
                reason: "expected gpt-3.5-turbo, gpt-4 or gpt-4-32k",
            })?,
        };

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            None => 15,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: TIMEOUT_VAR,
                        value,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
        };

        let temperature = match lookup(TEMPERATURE_VAR) {
            None => 1.0,
            Some(value) => match value.trim().parse::<f32>() {
                Ok(t) if t > 0.0 && t <= 2.0 => t,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: TEMPERATURE_VAR,
                        value,
                        reason: "expected a number in (0, 2]",
                    })
                }
            },
        };

        let max_concurrent_generations = match lookup(CONCURRENCY_VAR) {
            None => 4,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: CONCURRENCY_VAR,
                        value,
                        reason: "expected a whole number of at least 1",
                    })
                }
            },
        };

        Ok(Self {
            model: ModelConfig {
                api_key,
                engine,
                timeout: Duration::from_secs(timeout_secs),
                temperature,
            },
            max_concurrent_generations,
        })
    }
}

fn parse_engine(value: &str) -> Option<ChatGPTEngine> {
    match value.trim() {
        "gpt-3.5-turbo" => Some(ChatGPTEngine::Gpt35Turbo),
        "gpt-4" => Some(ChatGPTEngine::Gpt4),
        "gpt-4-32k" => Some(ChatGPTEngine::Gpt4_32k),
        _ => None,
    }
}
