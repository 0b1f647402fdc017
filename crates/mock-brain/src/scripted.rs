//! Scripted brain implementation - answers from a script and records requests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use brain_core::{Brain, BrainError, GenerationRequest};

/// One queued answer.
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Failure(String),
}

/// A brain that answers from a script.
///
/// Resolution order for each call:
/// 1. the first rule whose needle occurs in the system instruction,
/// 2. the next queued reply or failure,
/// 3. the fallback reply, if set,
/// 4. otherwise `BrainError::Unavailable`.
///
/// Every request is recorded for later inspection.
#[derive(Debug, Default)]
pub struct ScriptedBrain {
    rules: Vec<(String, String)>,
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedBrain {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        lock(&self.queue).push_back(Scripted::Reply(reply.into()));
        self
    }

    /// Queue several replies in order.
    pub fn with_replies<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut queue = lock(&self.queue);
            for reply in replies {
                queue.push_back(Scripted::Reply(reply.into()));
            }
        }
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        lock(&self.queue).push_back(Scripted::Failure(reason.into()));
        self
    }

    /// Always answer `reply` when the system instruction contains `needle`.
    pub fn on_system(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), reply.into()));
        self
    }

    /// Answer `reply` once rules and queue are exhausted.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Number of queued answers not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.queue).len()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        let rule_reply = self
            .rules
            .iter()
            .find(|(needle, _)| request.system.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        lock(&self.requests).push(request);

        if let Some(reply) = rule_reply {
            return Ok(reply);
        }

        match lock(&self.queue).pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Failure(reason)) => Err(BrainError::ProcessingFailed(reason)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| BrainError::Unavailable("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
