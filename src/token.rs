use alloc::{boxed::Box, vec::Vec};
use core::{
    any::TypeId,
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::atomic::{self, AtomicUsize},
};

use crate::{
    any::TypeInfo,
    dependency_resolver::DependencyResolver,
    errors::InstantiateErrorKind,
    inject::Injectable,
    instantiator::{boxed_fn_instantiator, boxed_injectable, boxed_instantiator, Arguments, BoxedCloneInstantiator, Instantiator},
    service::Service as _,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

static NEXT_UNIQUE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a [`Token`].
/// Type tokens are keyed by the [`TypeId`] of the service, other tokens get a process-unique number on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenId {
    Type(TypeId),
    Unique(usize),
}

impl TokenId {
    #[inline]
    #[must_use]
    fn next_unique() -> Self {
        Self::Unique(NEXT_UNIQUE_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Identity and name of a token, cheap to copy into errors and logs
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub id: TokenId,
    pub name: &'static str,
}

impl PartialEq for TokenInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TokenInfo {}

impl Display for TokenInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Clone)]
enum Declaration {
    Static(fn() -> Vec<Token>),
    List(Box<[Token]>),
}

struct TokenInner {
    info: TokenInfo,
    provides: TypeInfo,
    instantiator: BoxedCloneInstantiator,
    declaration: Declaration,
}

/// Handle to a constructible service.
///
/// A token is at the same time the registry key, the way to build the instance and the marker of its type.
/// Tokens compare by identity: [`Token::of`] for the same type always yields equal tokens,
/// while every [`Token::provide`] and [`Token::from_fn`] call yields a token equal only to its clones.
#[derive(Clone)]
pub struct Token {
    inner: RcThreadSafety<TokenInner>,
}

impl Token {
    /// Token of an [`Injectable`] type.
    /// Its declared dependencies are the tokens of [`Injectable::Dependencies`].
    #[must_use]
    pub fn of<T: Injectable>() -> Self {
        let provides = TypeInfo::of::<T>();
        Self::new(
            TokenInfo {
                id: TokenId::Type(provides.id),
                name: provides.short_name(),
            },
            provides,
            boxed_injectable::<T>(),
            Declaration::Static(<T::Dependencies as DependencyResolver>::tokens),
        )
    }

    /// Unique token built from an instantiator, usually a closure taking [`crate::Inject`] arguments.
    /// Its declared dependencies are taken from the instantiator arguments.
    #[must_use]
    pub fn provide<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps> + SendSafety + SyncSafety,
        Inst::Provides: SendSafety + SyncSafety,
        Deps: DependencyResolver,
    {
        let provides = TypeInfo::of::<Inst::Provides>();
        Self::new(
            TokenInfo {
                id: TokenId::next_unique(),
                name: provides.short_name(),
            },
            provides,
            boxed_instantiator(instantiator),
            Declaration::Static(Deps::tokens),
        )
    }

    /// Unique token built from a function over positional [`Arguments`].
    /// The declared dependencies are `dependencies`, the `n`th of them fills the `n`th argument.
    #[must_use]
    pub fn from_fn<F, T>(name: &'static str, dependencies: impl IntoIterator<Item = Token>, f: F) -> Self
    where
        F: FnMut(&mut Arguments) -> Result<T, InstantiateErrorKind> + Clone + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        Self::new(
            TokenInfo {
                id: TokenId::next_unique(),
                name,
            },
            TypeInfo::of::<T>(),
            boxed_fn_instantiator(f),
            Declaration::List(dependencies.into_iter().collect()),
        )
    }

    #[inline]
    fn new(info: TokenInfo, provides: TypeInfo, instantiator: BoxedCloneInstantiator, declaration: Declaration) -> Self {
        Self {
            inner: RcThreadSafety::new(TokenInner {
                info,
                provides,
                instantiator,
                declaration,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TokenId {
        self.inner.info.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.info.name
    }

    #[inline]
    #[must_use]
    pub fn info(&self) -> TokenInfo {
        self.inner.info
    }

    /// Type of the instance the token constructs
    #[inline]
    #[must_use]
    pub fn provides(&self) -> TypeInfo {
        self.inner.provides
    }

    /// Dependencies attached to the token when it was created
    #[must_use]
    pub fn declared_dependencies(&self) -> Vec<Token> {
        match &self.inner.declaration {
            Declaration::Static(tokens) => tokens(),
            Declaration::List(tokens) => tokens.to_vec(),
        }
    }

    #[inline]
    pub(crate) fn instantiate(&self, arguments: Arguments) -> Result<RcAnyThreadSafety, InstantiateErrorKind> {
        self.inner.instantiator.clone().call(arguments)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Token {}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenId};
    use crate::{inject::Injectable, Inject, InstantiateErrorKind};

    use alloc::vec::Vec;
    use core::any::TypeId;

    struct Sun;

    impl Injectable for Sun {
        type Dependencies = ();

        fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
            Ok(Sun)
        }
    }

    struct Flower;

    impl Injectable for Flower {
        type Dependencies = (Inject<Sun>,);

        fn construct(_: (Inject<Sun>,)) -> Result<Self, InstantiateErrorKind> {
            Ok(Flower)
        }
    }

    #[test]
    fn test_type_tokens_are_equal() {
        assert_eq!(Token::of::<Sun>(), Token::of::<Sun>());
        assert_ne!(Token::of::<Sun>(), Token::of::<Flower>());
        assert_eq!(Token::of::<Sun>().id(), TokenId::Type(TypeId::of::<Sun>()));
        assert_eq!(Token::of::<Sun>().name(), "Sun");
    }

    #[test]
    fn test_unique_tokens_compare_by_identity() {
        let token_1 = Token::from_fn("unit", [], |_| Ok(()));
        let token_2 = Token::from_fn("unit", [], |_| Ok(()));

        assert_ne!(token_1, token_2);
        assert_eq!(token_1, token_1.clone());
        assert_ne!(Token::provide(|| Ok::<_, InstantiateErrorKind>(Sun)), Token::of::<Sun>());
    }

    #[test]
    fn test_declared_dependencies() {
        assert!(Token::of::<Sun>().declared_dependencies().is_empty());
        assert_eq!(Token::of::<Flower>().declared_dependencies(), [Token::of::<Sun>()]);

        let sun = Token::of::<Sun>();
        let flower = Token::of::<Flower>();
        let token = Token::from_fn("garden", [flower.clone(), sun.clone()], |_| Ok(()));
        assert_eq!(token.declared_dependencies(), [flower, sun]);

        let provided = Token::provide(|Inject(_): Inject<Sun>, Inject(_): Inject<Flower>| Ok::<_, InstantiateErrorKind>(()));
        let names: Vec<_> = provided.declared_dependencies().iter().map(Token::name).collect();
        assert_eq!(names, ["Sun", "Flower"]);
    }
}
