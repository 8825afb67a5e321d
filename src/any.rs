use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
};

use crate::utils::thread_safety::RcAnyThreadSafety;

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Last path segment of the type name, e.g. `Student` for `app::services::Student`.
    /// Generic arguments are kept as is.
    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let path = self.name.split_once('<').map_or(self.name, |(path, _)| path);
        match path.rsplit_once("::") {
            Some((prefix, _)) => &self.name[prefix.len() + 2..],
            None => self.name,
        }
    }
}

/// Type id of the value behind a type-erased instance, not of the pointer holding it.
#[inline]
#[must_use]
pub(crate) fn instance_type_id(instance: &RcAnyThreadSafety) -> TypeId {
    let any: &dyn Any = &**instance;
    any.type_id()
}
