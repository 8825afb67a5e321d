use alloc::{vec, vec::Vec};

use crate::{
    dependency_resolver::DependencyResolver,
    errors::InstantiateErrorKind,
    instantiator::Arguments,
    token::Token,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Service with statically declared dependencies.
///
/// This is what the injector needs instead of runtime reflection over constructor parameters:
/// `Dependencies` lists the dependency tokens in argument order and [`Injectable::construct`] receives their resolved instances.
///
/// # Examples
/// ```rust
/// use flat_injector::{Inject, Injectable, InstantiateErrorKind};
/// use std::sync::Arc;
///
/// struct ApiService;
/// struct StoreService;
/// struct UserService(Arc<ApiService>, Arc<StoreService>);
///
/// impl Injectable for ApiService {
///     type Dependencies = ();
///
///     fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
///         Ok(ApiService)
///     }
/// }
///
/// impl Injectable for StoreService {
///     type Dependencies = ();
///
///     fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
///         Ok(StoreService)
///     }
/// }
///
/// impl Injectable for UserService {
///     type Dependencies = (Inject<ApiService>, Inject<StoreService>);
///
///     fn construct((Inject(api), Inject(store)): Self::Dependencies) -> Result<Self, InstantiateErrorKind> {
///         Ok(UserService(api, store))
///     }
/// }
/// ```
pub trait Injectable: SendSafety + SyncSafety + Sized + 'static {
    type Dependencies: DependencyResolver;

    /// # Errors
    /// Returns an error if the service can't be built from its dependencies
    fn construct(dependencies: Self::Dependencies) -> Result<Self, InstantiateErrorKind>;
}

/// Single positional dependency on the token of `Dep`
pub struct Inject<Dep>(pub RcThreadSafety<Dep>);

impl<Dep: Injectable> DependencyResolver for Inject<Dep> {
    #[inline]
    fn tokens() -> Vec<Token> {
        vec![Token::of::<Dep>()]
    }

    #[inline]
    fn resolve(arguments: &mut Arguments) -> Result<Self, InstantiateErrorKind> {
        arguments.take().map(Self)
    }
}
