use alloc::vec::{self, Vec};
use tracing::debug;

use crate::{
    any::{instance_type_id, TypeInfo},
    dependency_resolver::DependencyResolver,
    errors::InstantiateErrorKind,
    inject::Injectable,
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

pub trait Instantiator<Deps>: Clone + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

/// Resolved dependency values handed to a constructor, in the order the dependencies were declared
pub struct Arguments {
    values: vec::IntoIter<RcAnyThreadSafety>,
    position: usize,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<RcAnyThreadSafety>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Takes the next argument and downcasts it to `T`.
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if all the arguments are already taken
    /// - Returns [`InstantiateErrorKind::IncorrectArgumentType`] if the argument isn't a `T`.
    ///   The argument is consumed anyway, so the next call gets the following one
    pub fn take<T: SendSafety + SyncSafety + 'static>(&mut self) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
        let position = self.position;
        let Some(value) = self.values.next() else {
            return Err(InstantiateErrorKind::MissingArgument { position });
        };
        self.position += 1;

        let actual = instance_type_id(&value);
        value.downcast::<T>().map_err(|_| {
            debug!(position, ?actual, "Incorrect argument type");
            InstantiateErrorKind::IncorrectArgumentType {
                position,
                expected: TypeInfo::of::<T>(),
            }
        })
    }

    /// Count of arguments not taken yet
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

pub(crate) type BoxedCloneInstantiator = BoxCloneService<Arguments, RcAnyThreadSafety, InstantiateErrorKind>;

#[must_use]
pub(crate) fn boxed_instantiator<Inst, Deps>(instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Deps> + SendSafety + SyncSafety,
    Inst::Provides: SendSafety + SyncSafety,
    Deps: DependencyResolver,
{
    BoxCloneService::new(service_fn({
        move |mut arguments: Arguments| -> Result<RcAnyThreadSafety, InstantiateErrorKind> {
            let dependencies = Deps::resolve(&mut arguments)?;
            let dependency = match instantiator.clone().instantiate(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(err.into()),
            };

            debug!("Instantiated");

            Ok(RcThreadSafety::new(dependency) as RcAnyThreadSafety)
        }
    }))
}

#[must_use]
pub(crate) fn boxed_injectable<T: Injectable>() -> BoxedCloneInstantiator {
    BoxCloneService::new(service_fn(|mut arguments: Arguments| -> Result<RcAnyThreadSafety, InstantiateErrorKind> {
        let dependencies = <T::Dependencies as DependencyResolver>::resolve(&mut arguments)?;
        let dependency = T::construct(dependencies)?;

        debug!("Instantiated");

        Ok(RcThreadSafety::new(dependency) as RcAnyThreadSafety)
    }))
}

#[must_use]
pub(crate) fn boxed_fn_instantiator<F, T>(mut f: F) -> BoxedCloneInstantiator
where
    F: FnMut(&mut Arguments) -> Result<T, InstantiateErrorKind> + Clone + SendSafety + SyncSafety + 'static,
    T: SendSafety + SyncSafety + 'static,
{
    BoxCloneService::new(service_fn(move |mut arguments: Arguments| -> Result<RcAnyThreadSafety, InstantiateErrorKind> {
        let dependency = f(&mut arguments)?;

        debug!("Instantiated");

        Ok(RcThreadSafety::new(dependency) as RcAnyThreadSafety)
    }))
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);
