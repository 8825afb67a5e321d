use alloc::vec::Vec;

use crate::{errors::InstantiateErrorKind, instantiator::Arguments, token::Token};

/// Positional dependency list of a constructor.
///
/// [`Self::tokens`] declares which tokens to resolve and [`Self::resolve`] takes the resolved values back in the same order,
/// so a single type describes both sides of the constructor contract.
pub trait DependencyResolver: Sized {
    #[must_use]
    fn tokens() -> Vec<Token>;

    /// # Errors
    /// Returns an error if the arguments don't match the declared tokens
    fn resolve(arguments: &mut Arguments) -> Result<Self, InstantiateErrorKind>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            #[inline]
            fn tokens() -> Vec<Token> {
                let mut tokens = Vec::new();
                $( tokens.extend($ty::tokens()); )*
                tokens
            }

            #[inline]
            #[allow(unused_variables)]
            fn resolve(arguments: &mut Arguments) -> Result<Self, InstantiateErrorKind> {
                Ok(($($ty::resolve(arguments)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    use super::DependencyResolver;
    use crate::{
        inject::{Inject, Injectable},
        instantiator::Arguments,
        token::Token,
        utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety},
        InstantiateErrorKind,
    };

    use alloc::vec;

    struct X(u8);
    struct Y(u8);
    struct Z(u8);

    macro_rules! leaf {
        ($($ty:ident),*) => {
            $(
                impl Injectable for $ty {
                    type Dependencies = ();

                    fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
                        Ok($ty(0))
                    }
                }
            )*
        };
    }

    leaf!(X, Y, Z);

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: Injectable>() {
            resolver::<Inject<Dep>>();
            resolver::<(Inject<Dep>, Inject<Dep>)>();
            resolver::<((Inject<Dep>,), Inject<Dep>)>();
        }
    }

    #[test]
    fn test_tokens_keep_order() {
        type Deps = (Inject<X>, Inject<Y>, Inject<Z>);

        assert_eq!(Deps::tokens(), [Token::of::<X>(), Token::of::<Y>(), Token::of::<Z>()]);
        assert!(<()>::tokens().is_empty());
    }

    #[test]
    fn test_resolve_positional() {
        let mut arguments = Arguments::new(vec![
            RcThreadSafety::new(X(1)) as RcAnyThreadSafety,
            RcThreadSafety::new(Y(2)) as RcAnyThreadSafety,
            RcThreadSafety::new(Z(3)) as RcAnyThreadSafety,
        ]);

        let (Inject(x), Inject(y), Inject(z)) = <(Inject<X>, Inject<Y>, Inject<Z>)>::resolve(&mut arguments).unwrap();
        assert_eq!((x.0, y.0, z.0), (1, 2, 3));
    }

    #[test]
    fn test_resolve_swapped_fails() {
        let mut arguments = Arguments::new(vec![
            RcThreadSafety::new(Y(2)) as RcAnyThreadSafety,
            RcThreadSafety::new(X(1)) as RcAnyThreadSafety,
        ]);

        assert!(matches!(
            <(Inject<X>, Inject<Y>)>::resolve(&mut arguments),
            Err(InstantiateErrorKind::IncorrectArgumentType { position: 0, .. })
        ));
    }
}
