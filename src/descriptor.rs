use alloc::{collections::BTreeMap, vec::Vec};

use crate::token::{Token, TokenId};

/// Source of the ordered dependency tokens of a token.
///
/// The injector consults it once per registration. Implementations must be deterministic and side-effect free.
/// An empty list means the token takes no dependencies, there is no separate "no metadata" answer.
pub trait DescriptorSource {
    #[must_use]
    fn describe(&self, token: &Token) -> Vec<Token>;
}

/// Uses the dependencies declared on the token itself
#[derive(Debug, Default, Clone, Copy)]
pub struct Declared;

impl DescriptorSource for Declared {
    #[inline]
    fn describe(&self, token: &Token) -> Vec<Token> {
        token.declared_dependencies()
    }
}

/// Explicit table of dependencies.
/// Tokens without an entry have no dependencies, whatever they declare themselves.
#[derive(Debug, Default, Clone)]
pub struct DependencyTable {
    entries: BTreeMap<TokenId, Vec<Token>>,
}

impl DependencyTable {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, token: &Token, dependencies: impl IntoIterator<Item = Token>) -> Self {
        self.insert(token, dependencies);
        self
    }

    /// Sets the dependencies of the token, returning the previous ones if any
    #[inline]
    pub fn insert(&mut self, token: &Token, dependencies: impl IntoIterator<Item = Token>) -> Option<Vec<Token>> {
        self.entries.insert(token.id(), dependencies.into_iter().collect())
    }
}

impl DescriptorSource for DependencyTable {
    #[inline]
    fn describe(&self, token: &Token) -> Vec<Token> {
        self.entries.get(&token.id()).cloned().unwrap_or_default()
    }
}

impl<F> DescriptorSource for F
where
    F: Fn(&Token) -> Vec<Token>,
{
    #[inline]
    fn describe(&self, token: &Token) -> Vec<Token> {
        self(token)
    }
}
