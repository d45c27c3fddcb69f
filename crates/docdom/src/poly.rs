//! Value-semantic ownership for heap-held polymorphic objects

use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Upcast to [`Any`] for concrete-type recovery.
///
/// Blanket-implemented for every `'static` type, so node traits only
/// need to list it as a supertrait to make visitor dispatch possible
/// through a base reference.
pub trait AsAny: Any {
    /// The object as a dynamically typed reference.
    fn as_any(&self) -> &dyn Any;

    /// The object as a dynamically typed mutable reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An owning, value-semantic handle to a heap-held polymorphic object.
///
/// `B` is a base trait object type (such as `dyn Symbol`). Cloning a
/// `PolyValue` deep-copies the held object through the base trait's
/// `clone_box` hook; base traits enable this with
/// [`impl_poly_clone!`](crate::impl_poly_clone). Moving transfers
/// ownership — the moved-from handle is statically unusable, which is
/// this design's rendition of the "non-dereferenceable after move"
/// contract.
///
/// Upcasting to a supertrait's handle reuses the existing allocation:
/// `PolyValue::from_box(value.into_box())` coerces the box in place, so
/// the conversion is O(1) and the payload is never copied.
pub struct PolyValue<B: ?Sized> {
    inner: Box<B>,
}

impl<B: ?Sized> PolyValue<B> {
    /// Wrap an already-boxed object.
    pub fn from_box(inner: Box<B>) -> Self {
        PolyValue { inner }
    }

    /// Borrow the held object through the base type.
    pub fn get(&self) -> &B {
        &self.inner
    }

    /// Mutably borrow the held object through the base type.
    pub fn get_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Unwrap into the owned box.
    pub fn into_box(self) -> Box<B> {
        self.inner
    }
}

impl<B: ?Sized + AsAny> PolyValue<B> {
    /// Borrow the held object as its concrete type, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }

    /// Mutably borrow the held object as its concrete type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut()
    }

    /// Whether the held object's concrete type is `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }
}

impl<B: ?Sized> Deref for PolyValue<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.inner
    }
}

impl<B: ?Sized> DerefMut for PolyValue<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.inner
    }
}

impl<B: ?Sized + fmt::Debug> fmt::Debug for PolyValue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// Implement [`Clone`] and concrete-value construction for a
/// `PolyValue` base trait.
///
/// The base trait must expose `fn clone_box(&self) -> PolyValue<dyn
/// Base>` (or the method named in the second form), which each concrete
/// type implements by boxing a `clone` of itself. The macro then
/// provides `Clone` for `PolyValue<dyn Base>` and `From<T>` for every
/// `T` implementing the base trait.
#[macro_export]
macro_rules! impl_poly_clone {
    ($base:path) => {
        $crate::impl_poly_clone!($base, clone_box);
    };
    ($base:path, $method:ident) => {
        impl Clone for $crate::poly::PolyValue<dyn $base> {
            fn clone(&self) -> Self {
                self.get().$method()
            }
        }

        impl<T: $base> From<T> for $crate::poly::PolyValue<dyn $base> {
            fn from(value: T) -> Self {
                Self::from_box(Box::new(value))
            }
        }
    };
}
