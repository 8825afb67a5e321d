#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod dependency_resolver;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod injector;
pub(crate) mod instantiator;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod token;

pub mod utils;

pub use any::TypeInfo;
pub use dependency_resolver::DependencyResolver;
pub use descriptor::{Declared, DependencyTable, DescriptorSource};
pub use errors::{Cycle, InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind};
pub use inject::{Inject, Injectable};
pub use injector::{Injector, Provider};
pub use instantiator::{Arguments, Instantiator};
pub use token::{Token, TokenId, TokenInfo};
