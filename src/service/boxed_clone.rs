use alloc::boxed::Box;

use super::base::Service;
use crate::utils::thread_safety::{SendSafety, SyncSafety};

#[cfg(feature = "thread_safe")]
type DynCloneService<Request, Response, Error> = dyn CloneService<Request, Response = Response, Error = Error> + Send + Sync;
#[cfg(not(feature = "thread_safe"))]
type DynCloneService<Request, Response, Error> = dyn CloneService<Request, Response = Response, Error = Error>;

pub(crate) struct BoxCloneService<Request, Response, Error>(Box<DynCloneService<Request, Response, Error>>);

impl<Request, Response, Error> BoxCloneService<Request, Response, Error> {
    #[inline]
    #[must_use]
    pub(crate) fn new<S>(service: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Error> + Clone + SendSafety + SyncSafety + 'static,
    {
        Self(Box::new(service))
    }
}

pub(crate) trait CloneService<Request>: Service<Request> {
    #[must_use]
    fn clone_box(&self) -> Box<DynCloneService<Request, Self::Response, Self::Error>>;
}

impl<Request, T> CloneService<Request> for T
where
    T: Service<Request> + Clone + SendSafety + SyncSafety + 'static,
{
    #[inline]
    fn clone_box(&self) -> Box<DynCloneService<Request, T::Response, T::Error>> {
        Box::new(self.clone())
    }
}

impl<Request, Response, Error> Clone for BoxCloneService<Request, Response, Error> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl<Request, Response, Error> Service<Request> for BoxCloneService<Request, Response, Error> {
    type Response = Response;
    type Error = Error;

    #[inline]
    fn call(&mut self, request: Request) -> Result<Self::Response, Self::Error> {
        self.0.call(request)
    }
}

#[cfg(test)]
mod tests {
    use core::{
        convert::Infallible,
        sync::atomic::{AtomicU8, Ordering},
    };

    use super::{BoxCloneService, Service as _};
    use crate::{service::service_fn, utils::thread_safety::RcThreadSafety};

    #[test]
    fn test_clone_shares_captures() {
        let call_count = RcThreadSafety::new(AtomicU8::new(0));

        let mut service = BoxCloneService::new(service_fn({
            let call_count = call_count.clone();
            move |val: u8| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(val * 2)
            }
        }));
        let mut cloned = service.clone();

        assert_eq!(service.call(2).unwrap(), 4);
        assert_eq!(cloned.call(3).unwrap(), 6);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
