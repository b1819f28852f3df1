//! Fact id generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use timebill_shared::types::FactId;
use uuid::Uuid;

/// Source of fresh fact ids.
pub trait UuidFactory {
    /// Returns a fresh id.
    fn next_fact_id(&self) -> FactId;
}

impl<F> UuidFactory for F
where
    F: Fn() -> Uuid,
{
    fn next_fact_id(&self) -> FactId {
        FactId::from_uuid(self())
    }
}

/// Factory over a stateful generator such as a counter closure.
///
/// [`UuidFactory`] takes `&self`, so the generator sits behind a mutex.
#[derive(Debug)]
pub struct FnMutUuids<F>(Mutex<F>);

impl<F> FnMutUuids<F>
where
    F: FnMut() -> Uuid,
{
    /// Wraps `generate`.
    #[must_use]
    pub const fn new(generate: F) -> Self {
        Self(Mutex::new(generate))
    }
}

impl<F> UuidFactory for FnMutUuids<F>
where
    F: FnMut() -> Uuid,
{
    fn next_fact_id(&self) -> FactId {
        let mut generate = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        FactId::from_uuid(generate())
    }
}

/// Random v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuids;

impl UuidFactory for RandomUuids {
    fn next_fact_id(&self) -> FactId {
        FactId::from_uuid(Uuid::new_v4())
    }
}

/// Deterministic ids `00000000-...-000000000001`, `...02`, and so on.
#[derive(Debug, Default)]
pub struct SequentialUuids {
    issued: AtomicU64,
}

impl SequentialUuids {
    /// Creates a generator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Returns the id the `n`-th call (1-based) produces.
    #[must_use]
    pub fn nth(n: u64) -> FactId {
        FactId::from_uuid(Uuid::from_u128(u128::from(n)))
    }
}

impl UuidFactory for SequentialUuids {
    fn next_fact_id(&self) -> FactId {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Self::nth(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialUuids::new();
        assert_eq!(ids.next_fact_id(), SequentialUuids::nth(1));
        assert_eq!(ids.next_fact_id(), SequentialUuids::nth(2));
    }

    #[test]
    fn test_closure_factory() {
        let fixed = Uuid::from_u128(7);
        let factory = move || fixed;
        assert_eq!(factory.next_fact_id(), FactId::from_uuid(fixed));
    }

    #[test]
    fn test_stateful_closure_factory() {
        let mut counter = 100u128;
        let factory = FnMutUuids::new(move || {
            counter += 1;
            Uuid::from_u128(counter)
        });
        assert_eq!(factory.next_fact_id(), FactId::from_uuid(Uuid::from_u128(101)));
        assert_eq!(factory.next_fact_id(), FactId::from_uuid(Uuid::from_u128(102)));
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(RandomUuids.next_fact_id(), RandomUuids.next_fact_id());
    }
}
