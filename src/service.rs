pub(crate) mod base;
pub(crate) mod boxed_clone;
pub(crate) mod service_fn;

pub(crate) use base::Service;
pub(crate) use boxed_clone::BoxCloneService;
pub(crate) use service_fn::service_fn;
