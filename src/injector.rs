use alloc::{boxed::Box, vec::Vec};
use parking_lot::RwLock;
use tracing::{debug, error, info_span, warn};

use crate::{
    any::TypeInfo,
    descriptor::{Declared, DescriptorSource},
    errors::{Cycle, InstantiatorErrorKind, ResolveErrorKind},
    inject::Injectable,
    instantiator::Arguments,
    registry::{Record, Registry, State},
    token::{Token, TokenInfo},
    utils::thread_safety::{BoxedDescriptorSource, RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Token with an optional explicit dependency list.
/// When the list is set, the injector uses it instead of asking its [`DescriptorSource`].
#[derive(Debug, Clone)]
pub struct Provider {
    pub(crate) token: Token,
    pub(crate) dependencies: Option<Vec<Token>>,
}

impl Provider {
    #[inline]
    #[must_use]
    pub const fn new(token: Token) -> Self {
        Self {
            token,
            dependencies: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = Token>) -> Self {
        self.dependencies = Some(dependencies.into_iter().collect());
        self
    }
}

impl From<Token> for Provider {
    #[inline]
    fn from(token: Token) -> Self {
        Self::new(token)
    }
}

/// Flat injector.
///
/// Owns the registry of tokens and builds at most one instance per registered token,
/// lazily and depth-first, the first time the token or one of its dependents is requested.
pub struct Injector {
    registry: RwLock<Registry>,
    descriptors: BoxedDescriptorSource,
}

impl Default for Injector {
    #[inline]
    fn default() -> Self {
        Self::new(Declared)
    }
}

impl Injector {
    /// Creates an empty injector which asks `descriptors` for the dependencies of every registered token
    #[inline]
    #[must_use]
    #[cfg(feature = "thread_safe")]
    pub fn new(descriptors: impl DescriptorSource + Send + Sync + 'static) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            descriptors: Box::new(descriptors),
        }
    }

    /// Creates an empty injector which asks `descriptors` for the dependencies of every registered token
    #[inline]
    #[must_use]
    #[cfg(not(feature = "thread_safe"))]
    pub fn new(descriptors: impl DescriptorSource + 'static) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            descriptors: Box::new(descriptors),
        }
    }

    /// Creates an injector with a batch of registrations. Order of the batch doesn't matter
    #[must_use]
    #[cfg(feature = "thread_safe")]
    pub fn with_providers<P: Into<Provider>>(
        descriptors: impl DescriptorSource + Send + Sync + 'static,
        providers: impl IntoIterator<Item = P>,
    ) -> Self {
        let injector = Self::new(descriptors);
        for provider in providers {
            injector.register_provider(provider.into());
        }
        injector
    }

    /// Creates an injector with a batch of registrations. Order of the batch doesn't matter
    #[must_use]
    #[cfg(not(feature = "thread_safe"))]
    pub fn with_providers<P: Into<Provider>>(descriptors: impl DescriptorSource + 'static, providers: impl IntoIterator<Item = P>) -> Self {
        let injector = Self::new(descriptors);
        for provider in providers {
            injector.register_provider(provider.into());
        }
        injector
    }

    /// Registers the token with dependencies from the descriptor source.
    ///
    /// Registration never builds anything. Registering a token again replaces its record and drops the cached instance,
    /// dependents resolved earlier keep the instance they were built with.
    #[inline]
    pub fn register(&self, token: Token) {
        self.register_provider(Provider::new(token));
    }

    /// Same as [`Self::register`], but an explicit dependency list of the provider wins over the descriptor source
    pub fn register_provider(&self, Provider { token, dependencies }: Provider) {
        let dependencies = match dependencies {
            Some(dependencies) => dependencies,
            None => self.descriptors.describe(&token),
        };
        let info = token.info();
        let dependencies_count = dependencies.len();

        if self.registry.write().insert(token, dependencies).is_some() {
            debug!(token = %info, dependencies_count, "Registered, previous record replaced");
        } else {
            debug!(token = %info, dependencies_count, "Registered");
        }
    }

    /// Gets the instance of the token, building it and its unresolved dependencies on first request.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::MissingBinding`] if the token or one of its dependencies isn't registered
    /// - Returns [`ResolveErrorKind::CircularDependency`] if the token depends on itself through its unresolved dependencies
    /// - Returns [`ResolveErrorKind::Instantiator`] if a dependency or the constructor of the token failed.
    ///   Dependencies built before the failure stay cached, the failed tokens stay unresolved and are retried on the next request
    pub fn resolve(&self, token: &Token) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        if let Some(cycle) = self.registry.read().find_cycle(token.info()) {
            let err = ResolveErrorKind::CircularDependency { cycle };
            error!("{}", err);
            return Err(err);
        }

        self.resolve_with_path(token, &mut Vec::new())
    }

    /// Typed version of [`Self::resolve`] for [`Injectable`] types
    ///
    /// # Errors
    /// Same as [`Self::resolve`]
    #[inline]
    pub fn get<T: Injectable>(&self) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        self.get_by_token(&Token::of::<T>())
    }

    /// Typed version of [`Self::resolve`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the token doesn't provide a `T`, nothing is built in this case
    /// - Other errors are the same as for [`Self::resolve`]
    pub fn get_by_token<T: SendSafety + SyncSafety + 'static>(&self, token: &Token) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        let expected = TypeInfo::of::<T>();
        let actual = token.provides();
        let incorrect_type = || {
            let err = ResolveErrorKind::IncorrectType { expected, actual };
            error!("{}", err);
            err
        };

        if actual != expected {
            return Err(incorrect_type());
        }

        self.resolve(token)?.downcast::<T>().map_err(|_| incorrect_type())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.registry.read().contains(&token.id())
    }

    /// Checks whether the token is registered and its instance is already built
    #[must_use]
    pub fn is_resolved(&self, token: &Token) -> bool {
        self.registry
            .read()
            .get(&token.id())
            .is_some_and(|record| record.resolved().is_some())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Injector {
    fn resolve_with_path(&self, token: &Token, path: &mut Vec<TokenInfo>) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let span = info_span!("get", token = token.name());
        let _guard = span.enter();

        let Some(record) = self.registry.read().get(&token.id()) else {
            let err = ResolveErrorKind::MissingBinding { token: token.info() };
            warn!("{}", err);
            return Err(err);
        };

        if let Some(instance) = record.resolved() {
            debug!("Found in cache");
            return Ok(instance);
        }
        debug!("Not found in cache");

        if let Some(position) = path.iter().position(|info| info.id == token.id()) {
            let mut cycle = path[position..].to_vec();
            cycle.push(token.info());

            let err = ResolveErrorKind::CircularDependency {
                cycle: Cycle(cycle.into_boxed_slice()),
            };
            error!("{}", err);
            return Err(err);
        }

        let _construction = record.construction.lock();
        match &*record.state.lock() {
            State::Resolved(instance) => {
                debug!("Resolved while waiting for construction lock");
                return Ok(instance.clone());
            }
            State::Resolving => {
                let err = ResolveErrorKind::CircularDependency {
                    cycle: Cycle(Box::new([token.info(), token.info()])),
                };
                error!("Reentered while constructing: {}", err);
                return Err(err);
            }
            State::Unresolved => {}
        }

        let resolving = record.begin_resolving();
        path.push(token.info());
        let result = self.construct(&record, path);
        path.pop();

        let instance = result?;
        resolving.finish(instance.clone());
        debug!("Resolved");
        Ok(instance)
    }

    fn construct(&self, record: &Record, path: &mut Vec<TokenInfo>) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let mut values = Vec::with_capacity(record.dependencies.len());
        for dependency in record.dependencies.iter() {
            match self.resolve_with_path(dependency, path) {
                Ok(value) => values.push(value),
                Err(err) => {
                    error!(dependency = dependency.name(), "{}", err);
                    return Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))));
                }
            }
        }

        record.token.instantiate(Arguments::new(values)).map_err(|err| {
            error!("{}", err);
            ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err))
        })
    }
}
