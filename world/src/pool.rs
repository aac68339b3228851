//! Fixed-capacity entity pools with generation-checked handles.

use bryte_core::Handle;

/// Payload stored in a [`Pool`] slot.
pub trait Recyclable: Default {
    /// Reports whether the slot holding this value may be handed to a new spawn.
    fn is_free(&self) -> bool;
}

#[derive(Clone, Debug, Default)]
struct Slot<T> {
    generation: u32,
    value: T,
}

/// Bounded arena that hands out the first free slot on every spawn.
///
/// Every spawn bumps the slot generation, so handles issued for a previous
/// occupant stop resolving once the slot is reused.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T: Recyclable> Pool<T> {
    /// Creates a pool with `capacity` free slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self { slots }
    }

    /// Number of slots, free or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.value.is_free()).count()
    }

    /// Stores the value in the first free slot, or returns `None` when the pool is full.
    pub fn spawn(&mut self, value: T) -> Option<Handle> {
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.value.is_free())?;
        let index = u32::try_from(index).ok()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.value = value;
        Some(Handle::new(index, slot.generation))
    }

    /// Resolves a handle to its occupant if the slot was not reused or freed since.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(usize::try_from(handle.index()).ok()?)?;
        (slot.generation == handle.generation() && !slot.value.is_free()).then_some(&slot.value)
    }

    /// Mutable variant of [`Pool::get`].
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self
            .slots
            .get_mut(usize::try_from(handle.index()).ok()?)?;
        if slot.generation == handle.generation() && !slot.value.is_free() {
            Some(&mut slot.value)
        } else {
            None
        }
    }

    /// Resets every slot to its free default. Generations are preserved.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.value = T::default();
        }
    }

    /// Iterates over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.value.is_free())
            .map(|(index, slot)| (Handle::new(index as u32, slot.generation), &slot.value))
    }

    /// Mutable variant of [`Pool::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| !slot.value.is_free())
            .map(|(index, slot)| (Handle::new(index as u32, slot.generation), &mut slot.value))
    }

    /// Handles of every occupied slot, in slot order.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}
