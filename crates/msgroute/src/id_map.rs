// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dense per-type storage keyed by message identifier.
//!
//! [`DenseTypeMap`] holds one slot per identifier in the family's range and
//! resolves a lookup with a single subtraction. Slots for identifiers that
//! no member uses stay at their initial value.
//!
//! The usual lifecycle is build once at startup, then read for the rest of
//! the process. [`TypeMapBuilder`] makes the two phases explicit; once the
//! map is shared behind `&` or `Arc`, writes are ruled out by the borrow
//! checker and concurrent reads need no synchronization.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{RegistryError, Result};
use crate::message::Message;
use crate::type_list::{Contains, IdentifierRange, TypeList};

/// Fixed-size array of `T`, one slot per identifier of the family `L`.
pub struct DenseTypeMap<L: TypeList, T> {
    slots: Box<[T]>,
    _family: PhantomData<fn() -> L>,
}

impl<L: TypeList, T> DenseTypeMap<L, T> {
    /// Smallest identifier of the family.
    pub const MIN_ID: usize = L::MIN_ID;

    /// Largest identifier of the family.
    pub const MAX_ID: usize = L::MAX_ID;

    /// Number of slots.
    pub const SIZE: usize = L::RANGE_SIZE;

    /// Create a map whose slot for `id` is initialized with `init(id)`.
    pub fn from_fn(mut init: impl FnMut(usize) -> T) -> Self {
        let slots: Box<[T]> = (0..L::RANGE_SIZE).map(|i| init(L::MIN_ID + i)).collect();
        Self {
            slots,
            _family: PhantomData,
        }
    }

    /// Identifier limits of the map.
    pub const fn range() -> IdentifierRange {
        IdentifierRange::of::<L>()
    }

    /// Get the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdOutOfRange`] if `id` lies outside the
    /// family's identifier range.
    pub fn get_by_id(&self, id: usize) -> Result<&T> {
        let index = Self::index_of(id)?;
        Ok(&self.slots[index])
    }

    /// Get the slot of the member type `M`.
    ///
    /// Membership is checked at build time:
    ///
    /// ```compile_fail
    /// use msgroute::hellogoodbye::{HelloReply, HelloRequest};
    /// use msgroute::{type_list, DenseTypeMap};
    ///
    /// let map: DenseTypeMap<type_list![HelloRequest], u32> = DenseTypeMap::new();
    /// map.get_by_type::<HelloReply, _>();
    /// ```
    pub fn get_by_type<M, I>(&self) -> &T
    where
        M: Message,
        L: Contains<M, I>,
    {
        &self.slots[M::TYPE_ID - L::MIN_ID]
    }

    /// Overwrite the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdOutOfRange`] if `id` lies outside the
    /// family's identifier range; the map is left untouched.
    pub fn set(&mut self, id: usize, value: T) -> Result<()> {
        let index = Self::index_of(id)?;
        self.slots[index] = value;
        Ok(())
    }

    /// Overwrite the slot of the member type `M`.
    pub fn set_type<M, I>(&mut self, value: T)
    where
        M: Message,
        L: Contains<M, I>,
    {
        self.slots[M::TYPE_ID - L::MIN_ID] = value;
    }

    /// Number of slots (the family's range size).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the map has no slot at all (empty family).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(id, slot)` for the whole identifier range.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (L::MIN_ID + i, slot))
    }

    fn index_of(id: usize) -> Result<usize> {
        Self::range()
            .offset(id)
            .ok_or(RegistryError::IdOutOfRange {
                id,
                min: L::MIN_ID,
                max: L::MAX_ID,
            })
    }
}

impl<L: TypeList, T: Default> DenseTypeMap<L, T> {
    /// Create a map with every slot default-initialized.
    pub fn new() -> Self {
        Self::from_fn(|_| T::default())
    }

    /// Start building a map.
    pub fn builder() -> TypeMapBuilder<L, T> {
        TypeMapBuilder { map: Self::new() }
    }
}

impl<L: TypeList, T: Default> Default for DenseTypeMap<L, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: TypeList, T: Clone> Clone for DenseTypeMap<L, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            _family: PhantomData,
        }
    }
}

impl<L: TypeList, T: fmt::Debug> fmt::Debug for DenseTypeMap<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseTypeMap")
            .field("min_id", &L::MIN_ID)
            .field("max_id", &L::MAX_ID)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Initialization phase of a [`DenseTypeMap`].
pub struct TypeMapBuilder<L: TypeList, T> {
    map: DenseTypeMap<L, T>,
}

impl<L: TypeList, T> TypeMapBuilder<L, T> {
    /// Set the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdOutOfRange`] for identifiers outside the
    /// family's range.
    pub fn set(mut self, id: usize, value: T) -> Result<Self> {
        self.map.set(id, value)?;
        Ok(self)
    }

    /// Set the slot of the member type `M`.
    pub fn set_type<M, I>(mut self, value: T) -> Self
    where
        M: Message,
        L: Contains<M, I>,
    {
        self.map.set_type::<M, I>(value);
        self
    }

    /// Finish initialization.
    pub fn build(self) -> DenseTypeMap<L, T> {
        tracing::debug!(
            "Built type map: {} slots for ids [{}, {}]",
            self.map.len(),
            L::MIN_ID,
            L::MAX_ID
        );
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_list::Nil;

    macro_rules! message {
        ($name:ident, $id:expr) => {
            struct $name;
            impl Message for $name {
                const TYPE_ID: usize = $id;
                const NAME: &'static str = stringify!($name);
            }
        };
    }

    message!(Get, 4);
    message!(Set, 2);
    message!(Delete, 7);

    type Family = crate::type_list![Get, Set, Delete];

    #[test]
    fn test_new_map_is_default_filled() {
        let map: DenseTypeMap<Family, u32> = DenseTypeMap::new();
        assert_eq!(map.len(), 6);
        assert!(map.iter().all(|(_, v)| *v == 0));
        assert_eq!(DenseTypeMap::<Family, u32>::MIN_ID, 2);
        assert_eq!(DenseTypeMap::<Family, u32>::MAX_ID, 7);
        assert_eq!(DenseTypeMap::<Family, u32>::SIZE, 6);
    }

    #[test]
    fn test_set_then_get_every_id() {
        let mut map: DenseTypeMap<Family, usize> = DenseTypeMap::new();
        for id in 2..=7 {
            map.set(id, id * 100).unwrap();
        }
        for id in 2..=7 {
            assert_eq!(*map.get_by_id(id).unwrap(), id * 100);
        }
    }

    #[test]
    fn test_out_of_range_ids() {
        let mut map: DenseTypeMap<Family, u8> = DenseTypeMap::new();

        let err = map.get_by_id(1).unwrap_err();
        assert_eq!(
            err,
            RegistryError::IdOutOfRange {
                id: 1,
                min: 2,
                max: 7
            }
        );
        assert_eq!(err.to_string(), "Id 1 is out of range [2, 7]");

        assert!(map.get_by_id(8).is_err());
        assert!(map.set(8, 1).is_err());
        assert!(map.set(usize::MAX, 1).is_err());
        assert!(map.iter().all(|(_, v)| *v == 0));
    }

    #[test]
    fn test_get_by_type_matches_get_by_id() {
        let map: DenseTypeMap<Family, usize> = DenseTypeMap::from_fn(|id| id + 1);
        assert_eq!(*map.get_by_type::<Get, _>(), 5);
        assert_eq!(*map.get_by_type::<Set, _>(), 3);
        assert_eq!(*map.get_by_type::<Delete, _>(), 8);
        assert_eq!(map.get_by_type::<Get, _>(), map.get_by_id(4).unwrap());
    }

    #[test]
    fn test_unused_slots_keep_initial_value() {
        let mut map: DenseTypeMap<Family, Option<&str>> = DenseTypeMap::new();
        map.set_type::<Get, _>(Some("get"));
        assert_eq!(*map.get_by_id(3).unwrap(), None);
        assert_eq!(*map.get_by_id(4).unwrap(), Some("get"));
    }

    #[test]
    fn test_builder() {
        let map = DenseTypeMap::<Family, String>::builder()
            .set_type::<Set, _>("set".into())
            .set(7, "delete".into())
            .unwrap()
            .build();
        assert_eq!(map.get_by_type::<Set, _>(), "set");
        assert_eq!(map.get_by_type::<Delete, _>(), "delete");
        assert_eq!(map.get_by_type::<Get, _>(), "");

        assert!(DenseTypeMap::<Family, String>::builder()
            .set(42, "bogus".into())
            .is_err());
    }

    #[test]
    fn test_empty_family() {
        let mut map: DenseTypeMap<Nil, u32> = DenseTypeMap::new();
        assert!(map.is_empty());
        assert!(map.get_by_id(0).is_err());
        assert!(map.set(0, 1).is_err());
    }

    #[test]
    fn test_shared_reads_across_threads() {
        let map = std::sync::Arc::new(DenseTypeMap::<Family, usize>::from_fn(|id| id));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let map = map.clone();
                std::thread::spawn(move || {
                    (2..=7)
                        .map(|id| *map.get_by_id(id).unwrap())
                        .sum::<usize>()
                })
            })
            .collect();
        for handle in handles {
            let sum: usize = handle.join().unwrap();
            assert_eq!(sum, 27);
        }
    }
}
