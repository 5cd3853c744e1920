// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed message families as type-level lists.
//!
//! A family is written with the [`type_list!`](crate::type_list) macro and
//! expands to nested [`Cons`] cells terminated by [`Nil`]. Identifier limits
//! are associated constants, so they cost nothing at runtime:
//!
//! ```
//! use msgroute::hellogoodbye::{GoodbyeRequest, HelloRequest};
//! use msgroute::{type_list, IdentifierRange, TypeList};
//!
//! type Requests = type_list![HelloRequest, GoodbyeRequest];
//!
//! assert_eq!(Requests::MIN_ID, 65);
//! assert_eq!(Requests::MAX_ID, 67);
//! assert_eq!(Requests::RANGE_SIZE, 3);
//! assert_eq!(IdentifierRange::of::<Requests>().size, 3);
//! ```

use std::marker::PhantomData;

use crate::message::Message;

/// Empty family.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nil;

/// Family made of `H` followed by the family `T`.
pub struct Cons<H, T>(PhantomData<fn() -> (H, T)>);

/// Build a type-level message family.
///
/// `type_list![A, B, C]` expands to `Cons<A, Cons<B, Cons<C, Nil>>>`.
#[macro_export]
macro_rules! type_list {
    () => { $crate::type_list::Nil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::type_list::Cons<$head, $crate::type_list!($($tail),*)>
    };
}

/// Callback invoked once per family member, in list order.
pub trait TypeVisitor {
    fn visit<M: Message>(&mut self);
}

/// A closed, ordered family of message types.
pub trait TypeList: 'static {
    /// Number of members.
    const LEN: usize;

    /// Smallest member identifier (`usize::MAX` when empty).
    const MIN_ID: usize;

    /// Largest member identifier (`usize::MIN` when empty).
    const MAX_ID: usize;

    /// `MAX_ID - MIN_ID + 1`, or 0 when empty.
    const RANGE_SIZE: usize;

    /// Identifier of the first member named `name`, or 0 if none matches.
    ///
    /// Names are expected to be unique; duplicates are not detected and the
    /// first one in list order wins.
    fn id_by_name(name: &str) -> usize;

    /// Call `visitor` for every member.
    fn visit<V: TypeVisitor>(visitor: &mut V);
}

impl TypeList for Nil {
    const LEN: usize = 0;
    const MIN_ID: usize = usize::MAX;
    const MAX_ID: usize = usize::MIN;
    const RANGE_SIZE: usize = 0;

    fn id_by_name(_name: &str) -> usize {
        0
    }

    fn visit<V: TypeVisitor>(_visitor: &mut V) {}
}

impl<H: Message, T: TypeList> TypeList for Cons<H, T> {
    const LEN: usize = 1 + T::LEN;

    const MIN_ID: usize = if H::TYPE_ID <= T::MIN_ID {
        H::TYPE_ID
    } else {
        T::MIN_ID
    };

    const MAX_ID: usize = if H::TYPE_ID >= T::MAX_ID {
        H::TYPE_ID
    } else {
        T::MAX_ID
    };

    const RANGE_SIZE: usize = Self::MAX_ID - Self::MIN_ID + 1;

    fn id_by_name(name: &str) -> usize {
        if name == H::NAME {
            H::TYPE_ID
        } else {
            T::id_by_name(name)
        }
    }

    fn visit<V: TypeVisitor>(visitor: &mut V) {
        visitor.visit::<H>();
        T::visit(visitor);
    }
}

/// Index witness: the member is the head of the list.
pub struct Here;

/// Index witness: the member is somewhere in the tail.
pub struct There<I>(PhantomData<I>);

/// Build-time proof that `M` is a member of the family.
///
/// The index parameter `I` is inferred; callers write `_` for it. Asking
/// for a type outside the family does not compile.
pub trait Contains<M, I> {}

impl<M, T> Contains<M, Here> for Cons<M, T> {}

impl<H, T, M, I> Contains<M, There<I>> for Cons<H, T> where T: Contains<M, I> {}

/// Identifier of the first member of `L` named `name`, or 0.
pub fn type_id_by_name<L: TypeList>(name: &str) -> usize {
    L::id_by_name(name)
}

/// Identifier limits of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRange {
    pub min: usize,
    pub max: usize,
    pub size: usize,
}

impl IdentifierRange {
    /// The range of an empty family.
    pub const NONE: Self = Self {
        min: usize::MAX,
        max: usize::MIN,
        size: 0,
    };

    /// Limits of the family `L`.
    pub const fn of<L: TypeList>() -> Self {
        Self {
            min: L::MIN_ID,
            max: L::MAX_ID,
            size: L::RANGE_SIZE,
        }
    }

    /// Check if `id` falls within the range.
    pub const fn contains(&self, id: usize) -> bool {
        self.min <= id && id <= self.max
    }

    /// Check if the range covers no identifier at all.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Offset of `id` from the start of the range, if it falls within it.
    pub const fn offset(&self, id: usize) -> Option<usize> {
        if self.contains(id) {
            Some(id - self.min)
        } else {
            None
        }
    }
}

/// Collects `(id, name)` pairs of a family.
#[derive(Debug, Default)]
pub struct MemberCollector {
    pub members: Vec<(usize, &'static str)>,
}

impl TypeVisitor for MemberCollector {
    fn visit<M: Message>(&mut self) {
        self.members.push((M::TYPE_ID, M::NAME));
    }
}

/// `(id, name)` of every member of `L`, in list order.
pub fn members<L: TypeList>() -> Vec<(usize, &'static str)> {
    let mut collector = MemberCollector::default();
    L::visit(&mut collector);
    collector.members
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! message {
        ($name:ident, $id:expr, $label:expr) => {
            struct $name;
            impl Message for $name {
                const TYPE_ID: usize = $id;
                const NAME: &'static str = $label;
            }
        };
    }

    message!(Get, 12, "get");
    message!(Set, 10, "set");
    message!(Delete, 15, "delete");
    message!(Zero, 0, "zero");
    message!(Shadow, 20, "get");

    type Family = type_list![Get, Set, Delete];

    #[test]
    fn test_empty_list_has_no_range() {
        type Empty = type_list![];
        assert_eq!(Empty::LEN, 0);
        assert_eq!(Nil::RANGE_SIZE, 0);
        assert_eq!(Nil::MIN_ID, usize::MAX);
        assert_eq!(Nil::MAX_ID, usize::MIN);
        assert_eq!(IdentifierRange::of::<Nil>(), IdentifierRange::NONE);
        assert!(IdentifierRange::NONE.is_empty());
        assert!(!IdentifierRange::NONE.contains(0));
    }

    #[test]
    fn test_limits_of_unordered_family() {
        assert_eq!(Family::LEN, 3);
        assert_eq!(Family::MIN_ID, 10);
        assert_eq!(Family::MAX_ID, 15);
        assert_eq!(Family::RANGE_SIZE, 6);

        let range = IdentifierRange::of::<Family>();
        for (id, _) in members::<Family>() {
            assert!(range.contains(id));
        }
        assert_eq!(range.offset(10), Some(0));
        assert_eq!(range.offset(15), Some(5));
        assert_eq!(range.offset(16), None);
        assert_eq!(range.offset(9), None);
    }

    #[test]
    fn test_single_member() {
        type One = type_list![Delete];
        assert_eq!(One::MIN_ID, 15);
        assert_eq!(One::MAX_ID, 15);
        assert_eq!(One::RANGE_SIZE, 1);
    }

    #[test]
    fn test_id_zero_member() {
        type WithZero = type_list![Set, Zero];
        assert_eq!(WithZero::MIN_ID, 0);
        assert_eq!(WithZero::RANGE_SIZE, 11);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(type_id_by_name::<Family>("get"), 12);
        assert_eq!(type_id_by_name::<Family>("set"), 10);
        assert_eq!(type_id_by_name::<Family>("delete"), 15);
        assert_eq!(type_id_by_name::<Family>("touch"), 0);
        assert_eq!(type_id_by_name::<Nil>("get"), 0);
    }

    #[test]
    fn test_lookup_duplicate_name_first_wins() {
        type Dup = type_list![Shadow, Get];
        assert_eq!(type_id_by_name::<Dup>("get"), 20);

        type DupReversed = type_list![Get, Shadow];
        assert_eq!(type_id_by_name::<DupReversed>("get"), 12);
    }

    #[test]
    fn test_members_in_list_order() {
        assert_eq!(
            members::<Family>(),
            vec![(12, "get"), (10, "set"), (15, "delete")]
        );
    }

    fn assert_member<L: Contains<M, I>, M, I>() {}

    #[test]
    fn test_membership_witness() {
        assert_member::<Family, Get, _>();
        assert_member::<Family, Set, _>();
        assert_member::<Family, Delete, _>();
    }
}
