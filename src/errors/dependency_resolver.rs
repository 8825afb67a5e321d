use alloc::{boxed::Box, fmt};
use core::fmt::{Display, Formatter};

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::{any::TypeInfo, token::TokenInfo};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No binding registered for `{token}`")]
    MissingBinding { token: TokenInfo },
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: Cycle },
    #[error("Incorrect instance type. Actual: {}, expected: {}", actual.name, expected.name)]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}

impl ResolveErrorKind {
    /// Unwraps nested dependency failures down to the error that started the chain
    #[must_use]
    pub fn root_cause(&self) -> &ResolveErrorKind {
        let mut err = self;
        while let ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(inner)) = err {
            err = inner;
        }
        err
    }
}

/// Tokens forming a dependency cycle.
/// The first and the last elements are the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle(pub Box<[TokenInfo]>);

impl Cycle {
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &[TokenInfo] {
        &self.0
    }
}

impl Display for Cycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut tokens = self.0.iter();
        if let Some(token) = tokens.next() {
            write!(f, "{token}")?;
        }
        for token in tokens {
            write!(f, " -> {token}")?;
        }
        Ok(())
    }
}
