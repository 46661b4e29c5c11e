use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::BoxStream;
use models::Entity;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Lazily produced sequence of entities handed to the host.
pub type EntityStream<T> = BoxStream<'static, T>;

/// What `add` does when the Id is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Append anyway; lookups keep returning the first inserted match.
    #[default]
    Allow,
    /// Refuse the second entity with the same Id.
    Reject,
}

/// Ordered, insertion-stable sequence of entities of one type.
///
/// Cloning yields another handle onto the same sequence. All access goes through one
/// `RwLock`, so scans run concurrently and mutations are exclusive.
///
/// # Examples
/// ```
/// use models::Scope;
/// use service::storage::Collection;
/// let scopes = Collection::from_vec(vec![Scope::named("api").unwrap()]);
/// let found = tokio_test::block_on(scopes.find(|s| s.name == "api"));
/// assert_eq!(found.map(|s| s.id().to_string()), Some("api".to_string()));
/// ```
#[derive(Clone)]
pub struct Collection<T> {
    inner: Arc<RwLock<Entries<T>>>,
}

/// A stored entity tagged with a sequence number that survives `replace`.
struct Slot<T> {
    seq: u64,
    item: T,
}

struct Entries<T> {
    slots: Vec<Slot<T>>,
    next_seq: u64,
}

impl<T> Entries<T> {
    fn push(&mut self, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.push(Slot { seq, item });
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        let mut entries = Entries { slots: Vec::with_capacity(items.len()), next_seq: 0 };
        for item in items {
            entries.push(item);
        }
        Self { inner: Arc::new(RwLock::new(entries)) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.slots.is_empty()
    }

    /// Append at the end. Duplicate Ids are not detected.
    pub async fn add(&self, entity: T) {
        self.inner.write().await.push(entity);
    }

    /// Append unless an entity with the same Id is present; hands the entity back if so.
    pub async fn add_unique(&self, entity: T) -> Result<(), T> {
        let mut entries = self.inner.write().await;
        if entries.slots.iter().any(|slot| slot.item.id() == entity.id()) {
            return Err(entity);
        }
        entries.push(entity);
        Ok(())
    }

    /// Append with the given duplicate handling.
    pub async fn add_with(&self, entity: T, policy: DuplicatePolicy) -> Result<(), T> {
        match policy {
            DuplicatePolicy::Allow => {
                self.add(entity).await;
                Ok(())
            }
            DuplicatePolicy::Reject => self.add_unique(entity).await,
        }
    }

    /// Remove the first entity with this Id; no-op when absent.
    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut entries = self.inner.write().await;
        let index = entries.slots.iter().position(|slot| slot.item.id() == id)?;
        Some(entries.slots.remove(index).item)
    }

    /// Remove the first entity sharing the new entity's Id, then append the new one,
    /// under a single write lock. Returns whether a prior entity was replaced.
    ///
    /// The replacement keeps the prior entity's sequence number, so a scan that already
    /// yielded it does not yield it again from the end of the collection.
    pub async fn replace(&self, entity: T) -> bool {
        let mut entries = self.inner.write().await;
        match entries.slots.iter().position(|slot| slot.item.id() == entity.id()) {
            Some(index) => {
                let seq = entries.slots.remove(index).seq;
                entries.slots.push(Slot { seq, item: entity });
                true
            }
            None => {
                entries.push(entity);
                false
            }
        }
    }

    /// First match in insertion order.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let entries = self.inner.read().await;
        entries.slots.iter().map(|slot| &slot.item).find(|item| predicate(*item)).cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<T> {
        self.find(|item| item.id() == id).await
    }

    /// All matches in insertion order, produced one at a time.
    ///
    /// Each step takes the read lock, yields a clone of the first match not produced yet and
    /// remembers its sequence number. No index is materialized and writers are never blocked
    /// for the whole iteration. Entities replaced mid-iteration are yielded at most once;
    /// entities appended mid-iteration are still reached. Once `cancel` fires, no further
    /// elements are produced.
    pub fn filter<P>(&self, predicate: P, cancel: CancellationToken) -> EntityStream<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::pin(async_stream::stream! {
            let mut yielded = HashSet::new();
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                let next = {
                    let entries = inner.read().await;
                    entries
                        .slots
                        .iter()
                        .find(|slot| !yielded.contains(&slot.seq) && predicate(&slot.item))
                        .map(|slot| (slot.seq, slot.item.clone()))
                };
                match next {
                    Some((seq, item)) => {
                        yielded.insert(seq);
                        yield item;
                    }
                    None => break,
                }
            }
        })
    }

    /// Run `f` over the current contents, in order, under the read lock.
    pub async fn with_items<R>(&self, f: impl FnOnce(&[&T]) -> R) -> R {
        let entries = self.inner.read().await;
        let items: Vec<&T> = entries.slots.iter().map(|slot| &slot.item).collect();
        f(&items)
    }

    /// Clone of the current contents in insertion order.
    pub async fn snapshot(&self) -> Vec<T> {
        let entries = self.inner.read().await;
        entries.slots.iter().map(|slot| slot.item.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use models::Token;

    fn token(id: &str, subject: &str) -> Token {
        let mut t = Token::with_id(id).expect("non-empty id");
        t.subject = subject.into();
        t
    }

    #[tokio::test]
    async fn find_returns_first_match_in_insertion_order() {
        let tokens = Collection::new();
        tokens.add(token("t1", "alice")).await;
        tokens.add(token("t2", "alice")).await;
        let found = tokens.find(|t: &Token| t.subject == "alice").await;
        assert_eq!(found.map(|t| t.id().to_string()), Some("t1".into()));
        assert!(tokens.find(|t: &Token| t.subject == "bob").await.is_none());
    }

    #[tokio::test]
    async fn remove_takes_only_the_first_duplicate() {
        let tokens = Collection::new();
        tokens.add(token("dup", "first")).await;
        tokens.add(token("dup", "second")).await;
        let removed = tokens.remove("dup").await;
        assert_eq!(removed.map(|t| t.subject), Some("first".into()));
        assert_eq!(tokens.len().await, 1);
        assert!(tokens.remove("missing").await.is_none());
    }

    #[tokio::test]
    async fn add_unique_rejects_known_ids() {
        let tokens = Collection::new();
        assert!(tokens.add_with(token("t1", "a"), DuplicatePolicy::Reject).await.is_ok());
        let rejected = tokens.add_with(token("t1", "b"), DuplicatePolicy::Reject).await;
        assert_eq!(rejected.err().map(|t| t.subject), Some("b".into()));
        assert!(tokens.add_with(token("t1", "c"), DuplicatePolicy::Allow).await.is_ok());
        assert_eq!(tokens.len().await, 2);
    }

    #[tokio::test]
    async fn replace_is_remove_then_append() {
        let tokens = Collection::from_vec(vec![token("t1", "old"), token("t2", "x")]);
        assert!(tokens.replace(token("t1", "new")).await);
        let ids: Vec<String> = tokens.snapshot().await.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
        assert!(!tokens.replace(token("t3", "fresh")).await);
        assert_eq!(tokens.len().await, 3);
    }

    #[tokio::test]
    async fn filter_is_ordered_and_restartable() {
        let tokens = Collection::from_vec(vec![
            token("t1", "alice"),
            token("t2", "bob"),
            token("t3", "alice"),
        ]);
        let stream = tokens.filter(|t: &Token| t.subject == "alice", CancellationToken::new());
        let first: Vec<String> = stream.map(|t| t.id().to_string()).collect().await;
        assert_eq!(first, vec!["t1", "t3"]);

        let again: Vec<Token> = tokens
            .filter(|t: &Token| t.subject == "alice", CancellationToken::new())
            .collect()
            .await;
        assert_eq!(again.len(), 2);
    }

    #[tokio::test]
    async fn filter_is_lazy_and_sees_later_appends() {
        let tokens = Collection::from_vec(vec![token("t1", "alice")]);
        let mut stream = tokens.filter(|t: &Token| t.subject == "alice", CancellationToken::new());
        assert_eq!(stream.next().await.map(|t| t.id().to_string()), Some("t1".into()));
        tokens.add(token("t2", "alice")).await;
        assert_eq!(stream.next().await.map(|t| t.id().to_string()), Some("t2".into()));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn replacing_yielded_entities_mid_scan_visits_each_once() {
        let tokens = Collection::from_vec(vec![
            token("t1", "alice"),
            token("t2", "alice"),
            token("x", "bob"),
            token("t3", "alice"),
            token("t4", "alice"),
        ]);
        let mut stream = tokens.filter(|t: &Token| t.subject == "alice", CancellationToken::new());
        let mut seen = Vec::new();
        while let Some(mut t) = stream.next().await {
            seen.push(t.id().to_string());
            t.status = "revoked".into();
            assert!(tokens.replace(t).await);
        }
        assert_eq!(seen, vec!["t1", "t2", "t3", "t4"]);
        let positions: Vec<String> = tokens.snapshot().await.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(positions, vec!["x", "t1", "t2", "t3", "t4"]);
    }

    #[tokio::test]
    async fn entity_replaced_before_the_scan_reaches_it_is_still_yielded() {
        let tokens = Collection::from_vec(vec![token("t1", "a"), token("t2", "a"), token("t3", "a")]);
        let mut stream = tokens.filter(|_: &Token| true, CancellationToken::new());
        assert_eq!(stream.next().await.map(|t| t.id().to_string()), Some("t1".into()));
        tokens.replace(token("t2", "updated")).await;
        let rest: Vec<String> = stream.map(|t| t.subject).collect().await;
        assert_eq!(rest, vec!["a", "updated"]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_each_yielded() {
        let tokens = Collection::from_vec(vec![token("dup", "first"), token("dup", "second")]);
        let subjects: Vec<String> = tokens
            .filter(|_: &Token| true, CancellationToken::new())
            .map(|t| t.subject)
            .collect()
            .await;
        assert_eq!(subjects, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn cancelled_filter_stops_producing() {
        let tokens = Collection::from_vec(vec![token("t1", "a"), token("t2", "a")]);
        let cancel = CancellationToken::new();
        let mut stream = tokens.filter(|_: &Token| true, cancel.clone());
        assert!(stream.next().await.is_some());
        cancel.cancel();
        assert!(stream.next().await.is_none());
    }
}
