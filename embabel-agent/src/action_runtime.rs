//! Executes a single `Action` against a `Blackboard`: invokes the body bound
//! to the action's name, retries transient failures per its `Qos`, and
//! classifies the outcome into an `ActionStatus`.
//!
//! `Action` itself (in `embabel-core`) is pure data -- name, preconditions,
//! effects, cost/value. The callable that actually does the work is kept
//! separate and registered against the action's name in an `AgentDefinition`,
//! the same split the blackboard and planning system already draw between
//! "what a condition means" (data) and "how to evaluate it"
//! (`ConditionEvaluator`).

use std::sync::Arc;

use embabel_core::{Action, ActionStatus, Blackboard};

/// What an action body reports back, short of raising a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyOutcome {
    Succeeded,
    Paused(String),
    Waiting(String),
}

/// An action body's result: `Err` carries a human-readable failure message,
/// which the runtime classifies as transient or fatal before deciding
/// whether to retry.
pub type BodyResult = Result<BodyOutcome, String>;

/// The callable behavior bound to an action's name.
///
/// A body is responsible for resolving its own inputs off the blackboard
/// (`Blackboard::resolve`) and writing its own outputs back onto it
/// (`Blackboard::bind`) -- the runtime does not attempt to reflect over an
/// action's declared `Binding`s to do this generically, since those are
/// string type names kept for introspection and the remote action protocol,
/// not `TypeId`s a body's concrete closure could be driven by.
#[async_trait::async_trait]
pub trait ActionBody: Send + Sync {
    async fn invoke(&self, blackboard: &mut Blackboard) -> BodyResult;
}

struct FnBody<F>(F);

#[async_trait::async_trait]
impl<F> ActionBody for FnBody<F>
where
    F: Fn(&mut Blackboard) -> BodyResult + Send + Sync,
{
    async fn invoke(&self, blackboard: &mut Blackboard) -> BodyResult {
        (self.0)(blackboard)
    }
}

/// Wrap a plain synchronous closure as an `ActionBody`. Most bodies that
/// only touch the blackboard (no awaited collaborator call) can use this
/// instead of writing out the trait impl by hand.
pub fn from_fn(f: impl Fn(&mut Blackboard) -> BodyResult + Send + Sync + 'static) -> Arc<dyn ActionBody> {
    Arc::new(FnBody(f))
}

/// Substrings (matched case-insensitively) that mark a raised failure as
/// transient: worth retrying rather than surfacing to the process
/// immediately.
const TRANSIENT_PATTERNS: &[&str] = &[
    "rate limit",
    "rate-limited",
    "too many requests",
    "quota exceeded",
    "429",
    "timed out",
    "timeout",
    "connection reset",
    "connection refused",
    "500",
    "502",
    "503",
    "504",
];

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit",
    "too many requests",
    "quota exceeded",
    "rate-limited",
    "429",
];

/// Whether `message` names one of the recognized rate-limit phrasings.
pub fn is_rate_limited(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Whether `message` describes a failure worth retrying: a rate limit, a
/// timeout, or a transport/5xx-shaped error. Anything else (bad input,
/// auth, 4xx other than 429) is treated as fatal on the first attempt.
pub fn is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Run `action`'s body against `blackboard`, retrying per `action.qos` while
/// the raised failure looks transient, honoring `qos.timeout` per attempt.
///
/// No registered body is itself a (non-retried) failure: an agent
/// definition that lists an action with nothing bound to execute it is a
/// bug in the definition, not a transient condition.
pub async fn execute(action: &Action, body: Option<&dyn ActionBody>, blackboard: &mut Blackboard) -> ActionStatus {
    let Some(body) = body else {
        return ActionStatus::Failed {
            reason: format!("no action body registered for `{}`", action.name),
        };
    };

    let qos = action.qos;
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let invocation = body.invoke(blackboard);
        let outcome = match qos.timeout {
            Some(limit) => match tokio::time::timeout(limit, invocation).await {
                Ok(result) => result,
                Err(_) => Err(format!("action `{}` timed out after {:?}", action.name, limit)),
            },
            None => invocation.await,
        };

        match outcome {
            Ok(BodyOutcome::Succeeded) => return ActionStatus::Succeeded,
            Ok(BodyOutcome::Paused(reason)) => return ActionStatus::Paused { reason },
            Ok(BodyOutcome::Waiting(reason)) => return ActionStatus::Waiting { reason },
            Err(message) => {
                if is_transient(&message) && attempt < qos.max_attempts {
                    tracing::warn!(
                        action = %action.name,
                        attempt,
                        max_attempts = qos.max_attempts,
                        %message,
                        "transient action failure, retrying after backoff"
                    );
                    tokio::time::sleep(qos.backoff_for(attempt)).await;
                    continue;
                }
                return ActionStatus::Failed { reason: message };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embabel_core::condition::EffectSpec;
    use embabel_core::Qos;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn simple_action(qos: Qos) -> Action {
        Action::new("doThing", EffectSpec::new(), EffectSpec::new()).with_qos(qos)
    }

    #[tokio::test]
    async fn succeeding_body_returns_succeeded_on_first_attempt() {
        let action = simple_action(Qos::default());
        let body = from_fn(|_bb| Ok(BodyOutcome::Succeeded));
        let mut bb = Blackboard::new();
        let status = execute(&action, Some(body.as_ref()), &mut bb).await;
        assert_eq!(status, ActionStatus::Succeeded);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_until_it_succeeds() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counted = attempts.clone();
        let body = from_fn(move |_bb| {
            let n = counted.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("429 too many requests".to_string())
            } else {
                Ok(BodyOutcome::Succeeded)
            }
        });
        let qos = Qos {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_backoff: Duration::from_millis(2),
            timeout: None,
        };
        let action = simple_action(qos);
        let mut bb = Blackboard::new();
        let status = execute(&action, Some(body.as_ref()), &mut bb).await;
        assert_eq!(status, ActionStatus::Succeeded);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_failure_is_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counted = attempts.clone();
        let body = from_fn(move |_bb| {
            counted.fetch_add(1, Ordering::SeqCst);
            Err("401 unauthorized".to_string())
        });
        let qos = Qos::retrying(5);
        let action = simple_action(qos);
        let mut bb = Blackboard::new();
        let status = execute(&action, Some(body.as_ref()), &mut bb).await;
        assert!(matches!(status, ActionStatus::Failed { .. }));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_body_fails_without_invoking_anything() {
        let action = simple_action(Qos::default());
        let mut bb = Blackboard::new();
        let status = execute(&action, None, &mut bb).await;
        assert!(matches!(status, ActionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn slow_body_is_failed_by_its_timeout() {
        let qos = Qos {
            timeout: Some(Duration::from_millis(5)),
            ..Qos::default()
        };
        let action = simple_action(qos);
        let body = from_fn(|_bb| Ok(BodyOutcome::Succeeded));
        // Wrap in a body that sleeps past the timeout before reporting success.
        struct SlowBody;
        #[async_trait::async_trait]
        impl ActionBody for SlowBody {
            async fn invoke(&self, _blackboard: &mut Blackboard) -> BodyResult {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(BodyOutcome::Succeeded)
            }
        }
        let _ = body;
        let mut bb = Blackboard::new();
        let status = execute(&action, Some(&SlowBody), &mut bb).await;
        assert!(matches!(status, ActionStatus::Failed { .. }));
    }

    #[test]
    fn rate_limit_recognition_is_case_insensitive() {
        assert!(is_rate_limited("Rate Limit exceeded"));
        assert!(is_rate_limited("TOO MANY REQUESTS"));
        assert!(is_rate_limited("HTTP 429"));
        assert!(!is_rate_limited("file not found"));
    }
}
