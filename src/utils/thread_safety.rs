#[cfg(feature = "thread_safe")]
mod thread_safe {
    use alloc::{boxed::Box, sync::Arc};
    use core::any::Any;

    use crate::descriptor::DescriptorSource;

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send> SendSafety for T {}
    impl<T: Sync> SyncSafety for T {}

    pub type RcThreadSafety<T> = Arc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;

    pub(crate) type BoxedDescriptorSource = Box<dyn DescriptorSource + Send + Sync>;
}

#[cfg(not(feature = "thread_safe"))]
mod thread_unsafe {
    use alloc::{boxed::Box, rc::Rc};
    use core::any::Any;

    use crate::descriptor::DescriptorSource;

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T> SendSafety for T {}
    impl<T> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;

    pub(crate) type BoxedDescriptorSource = Box<dyn DescriptorSource>;
}

#[cfg(feature = "thread_safe")]
pub use thread_safe::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(feature = "thread_safe")]
pub(crate) use thread_safe::BoxedDescriptorSource;

#[cfg(not(feature = "thread_safe"))]
pub use thread_unsafe::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(not(feature = "thread_safe"))]
pub(crate) use thread_unsafe::BoxedDescriptorSource;
