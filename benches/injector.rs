#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use flat_injector::{injector, Inject, Injectable, Injector, InstantiateErrorKind, Token};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA(Arc<CAAAA>);
struct CAAAA(Arc<CAAAAA>);
struct CAAAAA;

macro_rules! wrapper {
    ($($ty:ident($dep:ident)),* $(,)?) => {
        $(
            impl Injectable for $ty {
                type Dependencies = (Inject<$dep>,);

                fn construct((Inject(dep),): Self::Dependencies) -> Result<Self, InstantiateErrorKind> {
                    Ok($ty(dep))
                }
            }
        )*
    };
}

wrapper!(C(CA), CA(CAA), CAA(CAAA), CAAA(CAAAA), CAAAA(CAAAAA));

impl Injectable for CAAAAA {
    type Dependencies = ();

    fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
        Ok(CAAAAA)
    }
}

impl Injectable for B {
    type Dependencies = ();

    fn construct((): ()) -> Result<Self, InstantiateErrorKind> {
        Ok(B(2))
    }
}

impl Injectable for A {
    type Dependencies = (Inject<B>, Inject<C>);

    fn construct((Inject(b), Inject(c)): Self::Dependencies) -> Result<Self, InstantiateErrorKind> {
        Ok(A(b, c))
    }
}

#[inline]
fn injector_new() -> Injector {
    injector![A, B, C, CA, CAA, CAAA, CAAAA, CAAAAA]
}

#[inline]
fn injector_get(injector: &Injector) {
    let _ = injector.get::<A>().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let cached = injector_new();
    injector_get(&cached);

    let numbers = Token::from_fn("numbers", [], |_| Ok((0..64).collect::<Vec<u32>>()));
    let sum = Token::from_fn("sum", [numbers.clone()], |arguments| {
        let numbers = arguments.take::<Vec<u32>>()?;
        Ok(numbers.iter().sum::<u32>())
    });

    c.bench_function("injector_new", |b| b.iter(injector_new))
        .bench_function("injector_get", |b| b.iter(|| injector_get(&injector_new())))
        .bench_function("injector_get_with_cache", |b| b.iter(|| injector_get(&cached)))
        .bench_function("injector_resolve_fn_tokens", |b| {
            b.iter(|| {
                let injector = Injector::with_providers(flat_injector::Declared, [numbers.clone(), sum.clone()]);
                let _ = injector.resolve(&sum).unwrap();
            })
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
