use alloc::{
    boxed::Box,
    collections::{btree_map::BTreeMap, btree_set::BTreeSet},
    vec::Vec,
};
use parking_lot::{Mutex, ReentrantMutex};

use crate::{
    errors::Cycle,
    token::{Token, TokenId, TokenInfo},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety},
};

pub(crate) enum State {
    Unresolved,
    Resolving,
    Resolved(RcAnyThreadSafety),
}

pub(crate) struct Record {
    pub(crate) token: Token,
    pub(crate) dependencies: Box<[Token]>,
    pub(crate) state: Mutex<State>,
    /// Held for the whole construction, so concurrent first-time resolvers of the same token run the constructor once.
    /// Reentrant: the owning thread coming back finds the record in [`State::Resolving`] instead of blocking on itself
    pub(crate) construction: ReentrantMutex<()>,
}

impl Record {
    #[inline]
    #[must_use]
    pub(crate) fn new(token: Token, dependencies: Vec<Token>) -> Self {
        Self {
            token,
            dependencies: dependencies.into_boxed_slice(),
            state: Mutex::new(State::Unresolved),
            construction: ReentrantMutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn resolved(&self) -> Option<RcAnyThreadSafety> {
        match &*self.state.lock() {
            State::Resolved(instance) => Some(instance.clone()),
            State::Unresolved | State::Resolving => None,
        }
    }

    #[inline]
    pub(crate) fn set_state(&self, state: State) {
        *self.state.lock() = state;
    }

    /// Moves the record to [`State::Resolving`].
    /// Unless [`ResolvingGuard::finish`] is called, the record goes back to [`State::Unresolved`] on drop,
    /// including when the constructor panics.
    #[inline]
    #[must_use]
    pub(crate) fn begin_resolving(&self) -> ResolvingGuard<'_> {
        self.set_state(State::Resolving);
        ResolvingGuard { record: self, finished: false }
    }
}

pub(crate) struct ResolvingGuard<'a> {
    record: &'a Record,
    finished: bool,
}

impl ResolvingGuard<'_> {
    #[inline]
    pub(crate) fn finish(mut self, instance: RcAnyThreadSafety) {
        self.record.set_state(State::Resolved(instance));
        self.finished = true;
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.record.set_state(State::Unresolved);
        }
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    records: BTreeMap<TokenId, RcThreadSafety<Record>>,
}

impl Registry {
    #[inline]
    pub(crate) fn insert(&mut self, token: Token, dependencies: Vec<Token>) -> Option<RcThreadSafety<Record>> {
        self.records.insert(token.id(), RcThreadSafety::new(Record::new(token, dependencies)))
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: &TokenId) -> Option<RcThreadSafety<Record>> {
        self.records.get(id).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &TokenId) -> bool {
        self.records.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Looks for a cycle in the unresolved part of the graph reachable from `start`.
    /// Resolved records and tokens without a record end the walk.
    #[must_use]
    pub(crate) fn find_cycle(&self, start: TokenInfo) -> Option<Cycle> {
        let mut visited = BTreeSet::new();
        let mut stack = Vec::new();

        if self.dfs_visit(start, &mut visited, &mut stack) {
            Some(Cycle(stack.into_boxed_slice()))
        } else {
            None
        }
    }

    fn dfs_visit(&self, info: TokenInfo, visited: &mut BTreeSet<TokenId>, stack: &mut Vec<TokenInfo>) -> bool {
        if visited.contains(&info.id) {
            return false;
        }
        if let Some(position) = stack.iter().position(|on_stack| on_stack.id == info.id) {
            stack.drain(..position);
            stack.push(info);
            return true;
        }

        let Some(record) = self.records.get(&info.id) else {
            visited.insert(info.id);
            return false;
        };
        if record.resolved().is_some() {
            visited.insert(info.id);
            return false;
        }

        stack.push(info);
        for dependency in record.dependencies.iter() {
            if self.dfs_visit(dependency.info(), visited, stack) {
                return true;
            }
        }
        stack.pop();

        visited.insert(info.id);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, State};
    use crate::{token::Token, utils::thread_safety::RcThreadSafety, InstantiateErrorKind};

    use alloc::{vec, vec::Vec};

    fn unit(name: &'static str) -> Token {
        Token::from_fn(name, [], |_| Ok::<_, InstantiateErrorKind>(()))
    }

    #[test]
    fn test_insert_overwrites() {
        let token = unit("a");
        let mut registry = Registry::default();

        assert!(registry.insert(token.clone(), Vec::new()).is_none());
        let previous = registry.insert(token.clone(), vec![unit("b")]).unwrap();

        assert!(previous.dependencies.is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&token.id()).unwrap().dependencies.len(), 1);
    }

    #[test]
    fn test_find_cycle() {
        let (a, b, c) = (unit("a"), unit("b"), unit("c"));
        let mut registry = Registry::default();
        registry.insert(a.clone(), vec![b.clone()]);
        registry.insert(b.clone(), vec![c.clone()]);
        registry.insert(c.clone(), vec![b.clone()]);

        let cycle = registry.find_cycle(a.info()).unwrap();
        assert_eq!(cycle.tokens(), [b.info(), c.info(), b.info()]);
        assert_eq!(alloc::format!("{cycle}"), "b -> c -> b");
    }

    #[test]
    fn test_find_cycle_self_dependency() {
        let a = unit("a");
        let mut registry = Registry::default();
        registry.insert(a.clone(), vec![a.clone()]);

        assert_eq!(registry.find_cycle(a.info()).unwrap().tokens(), [a.info(), a.info()]);
    }

    #[test]
    fn test_find_cycle_diamond_is_acyclic() {
        let (top, left, right, bottom) = (unit("top"), unit("left"), unit("right"), unit("bottom"));
        let mut registry = Registry::default();
        registry.insert(top.clone(), vec![left.clone(), right.clone()]);
        registry.insert(left, vec![bottom.clone()]);
        registry.insert(right, vec![bottom.clone()]);
        registry.insert(bottom, Vec::new());

        assert!(registry.find_cycle(top.info()).is_none());
    }

    #[test]
    fn test_find_cycle_stops_at_resolved_and_missing() {
        let (a, b, missing) = (unit("a"), unit("b"), unit("missing"));
        let mut registry = Registry::default();
        registry.insert(a.clone(), vec![missing, b.clone()]);
        registry.insert(b.clone(), vec![a.clone()]);

        assert!(registry.find_cycle(a.info()).is_some());

        registry
            .get(&b.id())
            .unwrap()
            .set_state(State::Resolved(RcThreadSafety::new(())));
        assert!(registry.find_cycle(a.info()).is_none());
    }
}
