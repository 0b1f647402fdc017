//! Per-user pending plan storage.
//!
//! Each user has at most one proposed plan waiting for "да" or "нет".
//! Proposals expire after a TTL so abandoned ones do not pile up.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use agent_tools::Plan;
use database::NewGoal;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

/// Default lifetime of an unconfirmed proposal.
pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(60 * 60);

/// A plan proposed to a user and not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlan {
    /// Target weight, kg.
    pub target_weight: f64,
    /// Weight the plan was computed from, kg.
    pub current_weight: f64,
    pub plan: Plan,
}

impl PendingPlan {
    pub fn new(target_weight: f64, current_weight: f64, plan: Plan) -> Self {
        Self {
            target_weight,
            current_weight,
            plan,
        }
    }

    /// The goal record written on confirmation.
    pub fn to_goal(&self) -> NewGoal {
        NewGoal {
            goal_text: format!("Цель {:.1} кг", self.target_weight),
            target_weight: self.target_weight,
            calories: self.plan.daily_calories,
            proteins: self.plan.protein_g,
            carbs: self.plan.carbs_g,
            fats: self.plan.fat_g,
            weeks: i64::from(self.plan.weeks),
        }
    }
}

#[derive(Debug)]
struct Slot {
    proposed_at: Instant,
    plan: PendingPlan,
}

type Cell = Arc<Mutex<Option<Slot>>>;

/// Single-slot pending plan store keyed by user id.
///
/// The map lock is only held to look up or insert a user's cell; each
/// user's proposal sits behind its own mutex, so a confirm in flight for
/// one user never blocks another user.
#[derive(Debug)]
pub struct PendingStore {
    cells: RwLock<HashMap<String, Cell>>,
    ttl: Duration,
}

impl Default for PendingStore {
    fn default() -> Self {
        Self::new(DEFAULT_PENDING_TTL)
    }
}

impl PendingStore {
    /// Create a store whose proposals live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, slot: &Slot) -> bool {
        slot.proposed_at.elapsed() < self.ttl
    }

    async fn cell(&self, user_id: &str) -> Option<Cell> {
        self.cells.read().await.get(user_id).cloned()
    }

    /// Drop cells that are idle and empty or expired. Busy cells are kept.
    fn prune(&self, cells: &mut HashMap<String, Cell>) {
        let before = cells.len();
        cells.retain(|_, cell| match cell.try_lock() {
            Ok(slot) => slot.as_ref().is_some_and(|slot| self.is_live(slot)),
            Err(_) => true,
        });
        if cells.len() < before {
            debug!(pruned = before - cells.len(), "Pruned expired pending plans");
        }
    }

    /// Store a proposal, replacing any earlier one for this user.
    pub async fn propose(&self, user_id: &str, plan: PendingPlan) {
        let cell = {
            let mut cells = self.cells.write().await;
            self.prune(&mut cells);
            Arc::clone(cells.entry(user_id.to_string()).or_default())
        };

        *cell.lock().await = Some(Slot {
            proposed_at: Instant::now(),
            plan,
        });

        // The cell may have been pruned while it was empty and unlocked.
        self.cells
            .write()
            .await
            .entry(user_id.to_string())
            .or_insert(cell);
    }

    /// The live proposal for a user, if any.
    pub async fn get(&self, user_id: &str) -> Option<PendingPlan> {
        let cell = self.cell(user_id).await?;
        let slot = cell.lock().await;
        slot.as_ref()
            .filter(|slot| self.is_live(slot))
            .map(|slot| slot.plan.clone())
    }

    /// Apply the user's proposal and clear it.
    ///
    /// `apply` runs while the user's slot is held, and the slot is cleared
    /// only if it succeeds. Returns `Ok(None)` when nothing is pending;
    /// `apply` is not called in that case.
    pub async fn confirm<F, Fut, T, E>(
        &self,
        user_id: &str,
        apply: F,
    ) -> Result<Option<(PendingPlan, T)>, E>
    where
        F: FnOnce(PendingPlan) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(cell) = self.cell(user_id).await else {
            return Ok(None);
        };
        let mut slot = cell.lock().await;

        let plan = match slot.as_ref() {
            Some(current) if self.is_live(current) => current.plan.clone(),
            Some(_) => {
                *slot = None;
                return Ok(None);
            }
            None => return Ok(None),
        };

        let applied = apply(plan.clone()).await?;
        *slot = None;
        Ok(Some((plan, applied)))
    }

    /// Drop the user's proposal. Returns `false` if nothing live was pending.
    pub async fn cancel(&self, user_id: &str) -> bool {
        let Some(cell) = self.cell(user_id).await else {
            return false;
        };
        let removed = cell.lock().await.take();
        removed.is_some_and(|slot| self.is_live(&slot))
    }

    /// Number of stored proposals, expired ones included until pruned.
    pub async fn len(&self) -> usize {
        let cells: Vec<Cell> = self.cells.read().await.values().cloned().collect();
        let mut count = 0;
        for cell in cells {
            if cell.lock().await.is_some() {
                count += 1;
            }
        }
        count
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_tools::{calculate_plan, PlanInput};
    use tokio::sync::oneshot;

    fn pending(target: f64) -> PendingPlan {
        PendingPlan::new(target, 88.0, calculate_plan(&PlanInput::new(88.0, target)))
    }

    #[tokio::test]
    async fn test_confirm_without_proposal() {
        let store = PendingStore::default();
        let mut called = false;

        let outcome = store
            .confirm("u1", |_| {
                called = true;
                async { Ok::<_, ()>(()) }
            })
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(!called);
    }

    #[tokio::test]
    async fn test_cancel_without_proposal() {
        let store = PendingStore::default();
        assert!(!store.cancel("u1").await);
    }

    #[tokio::test]
    async fn test_second_proposal_overwrites_first() {
        let store = PendingStore::default();
        store.propose("u1", pending(80.0)).await;
        store.propose("u1", pending(75.0)).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("u1").await.map(|p| p.target_weight), Some(75.0));
    }

    #[tokio::test]
    async fn test_confirm_applies_once() {
        let store = PendingStore::default();
        store.propose("u1", pending(75.0)).await;

        let first = store
            .confirm("u1", |plan| async move { Ok::<_, ()>(plan.target_weight) })
            .await
            .unwrap();
        assert_eq!(first.map(|(_, applied)| applied), Some(75.0));

        let second = store
            .confirm("u1", |plan| async move { Ok::<_, ()>(plan.target_weight) })
            .await
            .unwrap();
        assert!(second.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_apply_keeps_proposal() {
        let store = PendingStore::default();
        store.propose("u1", pending(75.0)).await;

        let result = store
            .confirm("u1", |_| async { Err::<(), _>("disk full") })
            .await;
        assert_eq!(result, Err("disk full"));
        assert!(store.get("u1").await.is_some());
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = PendingStore::default();
        store.propose("u1", pending(75.0)).await;
        store.propose("u2", pending(80.0)).await;

        assert!(store.cancel("u1").await);
        assert_eq!(store.get("u2").await.map(|p| p.target_weight), Some(80.0));
    }

    #[tokio::test]
    async fn test_confirm_in_flight_does_not_block_other_users() {
        let store = Arc::new(PendingStore::default());
        store.propose("u1", pending(75.0)).await;

        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let confirming = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .confirm("u1", move |plan| async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, ()>(plan.target_weight)
                    })
                    .await
            }
        });
        started_rx.await.unwrap();

        let other_user = async {
            store.propose("u2", pending(80.0)).await;
            let seen = store.get("u2").await.map(|p| p.target_weight);
            let cancelled = store.cancel("u2").await;
            (seen, cancelled)
        };
        let (seen, cancelled) = tokio::time::timeout(Duration::from_secs(5), other_user)
            .await
            .unwrap();
        assert_eq!(seen, Some(80.0));
        assert!(cancelled);

        release_tx.send(()).unwrap();
        let outcome = confirming.await.unwrap().unwrap();
        assert_eq!(outcome.map(|(_, applied)| applied), Some(75.0));
        assert!(store.get("u1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_proposal_is_absent() {
        let store = PendingStore::new(Duration::from_secs(60));
        store.propose("u1", pending(75.0)).await;

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(store.get("u1").await.is_none());
        let outcome = store
            .confirm("u1", |_| async { Ok::<_, ()>(()) })
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_propose_prunes_expired_slots() {
        let store = PendingStore::new(Duration::from_secs(60));
        store.propose("old", pending(75.0)).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        store.propose("new", pending(80.0)).await;

        assert_eq!(store.len().await, 1);
        assert!(!store.cancel("old").await);
    }

    #[test]
    fn test_goal_record_fields() {
        let plan = pending(75.0);
        let goal = plan.to_goal();

        assert_eq!(goal.goal_text, "Цель 75.0 кг");
        assert_eq!(goal.target_weight, 75.0);
        assert_eq!(goal.calories, plan.plan.daily_calories);
        assert_eq!(goal.weeks, i64::from(plan.plan.weeks));
    }
}
