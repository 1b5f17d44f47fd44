//! Record capability contract.

use std::fmt::Debug;
use std::hash::Hash;

/// A flat, parent-referencing value that can be assembled into a tree.
///
/// Any row-like type (a menu entry, an org unit, a permission scope) becomes
/// assemblable by exposing its identity, its parent's identity and a root
/// predicate. The predicate is authoritative: a record with a sentinel parent
/// is not automatically a root unless `is_root` says so.
pub trait Record {
    /// Identity type shared by `id` and `parent_id`.
    type Id: Clone + Eq + Hash + Debug;
    /// Data emitted for the record in output.
    type Payload: ?Sized;

    fn id(&self) -> Self::Id;

    fn parent_id(&self) -> Self::Id;

    /// Whether this record anchors a tree.
    fn is_root(&self) -> bool;

    /// Display label.
    fn title(&self) -> String;

    fn payload(&self) -> &Self::Payload;
}

/// Lets resolver output (`Vec<&T>`) be fed back into the assembler.
impl<T: Record + ?Sized> Record for &T {
    type Id = T::Id;
    type Payload = T::Payload;

    fn id(&self) -> Self::Id {
        (**self).id()
    }

    fn parent_id(&self) -> Self::Id {
        (**self).parent_id()
    }

    fn is_root(&self) -> bool {
        (**self).is_root()
    }

    fn title(&self) -> String {
        (**self).title()
    }

    fn payload(&self) -> &Self::Payload {
        (**self).payload()
    }
}
