mod dependency_resolver;
mod instantiate;
mod instantiator;

pub use dependency_resolver::{Cycle, ResolveErrorKind};
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
