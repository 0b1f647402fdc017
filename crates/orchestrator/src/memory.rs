//! Limits for the orchestrator's in-process state.

use std::env;
use std::time::Duration;

use crate::agent::DEFAULT_MAX_ITERATIONS;
use crate::pending::DEFAULT_PENDING_TTL;

/// Bounds for conversation memory, pending plans and the agent loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    /// Turns kept per user.
    pub max_turns: usize,
    /// Users tracked before the least recently active is evicted.
    pub max_users: usize,
    /// How long a proposed plan waits for confirmation.
    pub pending_ttl: Duration,
    /// Agent iterations per message.
    pub agent_max_iterations: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_users: 10_000,
            pending_ttl: DEFAULT_PENDING_TTL,
            agent_max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl MemorySettings {
    /// Load settings from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults. Zero is ignored
    /// for every limit.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(value) = env_usize("COACH_MEMORY_MAX_TURNS") {
            settings.max_turns = value;
        }
        if let Some(value) = env_usize("COACH_MEMORY_MAX_USERS") {
            settings.max_users = value;
        }
        if let Some(secs) = env_u64("COACH_PENDING_TTL_SECS") {
            settings.pending_ttl = Duration::from_secs(secs);
        }
        if let Some(value) = env_usize("COACH_AGENT_MAX_ITERATIONS") {
            settings.agent_max_iterations = value;
        }

        settings
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok()?.trim().parse().ok().filter(|v| *v > 0)
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok()?.trim().parse().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 4] = [
        "COACH_MEMORY_MAX_TURNS",
        "COACH_MEMORY_MAX_USERS",
        "COACH_PENDING_TTL_SECS",
        "COACH_AGENT_MAX_ITERATIONS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let settings = MemorySettings::from_env();
        assert_eq!(settings, MemorySettings::default());
        assert_eq!(settings.max_turns, 10);
        assert_eq!(settings.pending_ttl, Duration::from_secs(3600));
        assert_eq!(settings.agent_max_iterations, 5);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("COACH_MEMORY_MAX_TURNS", "4");
        env::set_var("COACH_MEMORY_MAX_USERS", "50");
        env::set_var("COACH_PENDING_TTL_SECS", "120");
        env::set_var("COACH_AGENT_MAX_ITERATIONS", "3");

        let settings = MemorySettings::from_env();
        clear_env();

        assert_eq!(settings.max_turns, 4);
        assert_eq!(settings.max_users, 50);
        assert_eq!(settings.pending_ttl, Duration::from_secs(120));
        assert_eq!(settings.agent_max_iterations, 3);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("COACH_MEMORY_MAX_TURNS", "many");
        env::set_var("COACH_PENDING_TTL_SECS", "0");

        let settings = MemorySettings::from_env();
        clear_env();

        assert_eq!(settings.max_turns, 10);
        assert_eq!(settings.pending_ttl, DEFAULT_PENDING_TTL);
    }
}
