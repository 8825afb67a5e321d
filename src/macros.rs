#[rustfmt::skip]
macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
    };
}

/// Creates an [`crate::Injector`] with the [`crate::Declared`] descriptor source,
/// pre-registered with the tokens of the given [`crate::Injectable`] types.
///
/// # Examples
/// ```rust
/// use flat_injector::{injector, Inject, Injectable, InstantiateErrorKind};
///
/// struct Sun;
///
/// impl Injectable for Sun {
///     type Dependencies = ();
///
///     fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
///         Ok(Sun)
///     }
/// }
///
/// struct Flower(std::sync::Arc<Sun>);
///
/// impl Injectable for Flower {
///     type Dependencies = (Inject<Sun>,);
///
///     fn construct((Inject(sun),): (Inject<Sun>,)) -> Result<Self, InstantiateErrorKind> {
///         Ok(Flower(sun))
///     }
/// }
///
/// let injector = injector![Flower, Sun];
/// let flower = injector.get::<Flower>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&flower.0, &injector.get::<Sun>().unwrap()));
/// ```
#[macro_export]
macro_rules! injector {
    () => {{
        $crate::Injector::default()
    }};
    ( $( $ty:ty ),+ $(,)? ) => {{
        $crate::Injector::with_providers($crate::Declared, [ $( $crate::Token::of::<$ty>() ),+ ])
    }};
}
