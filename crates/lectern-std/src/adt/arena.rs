use core::fmt;
use std::num::NonZeroUsize;

/// A type that can be used to index into an [`Arena`].
///
/// The index carries no ownership. It becomes stale once the slot it points
/// to is released, and may later alias a new element allocated into the same
/// slot.
pub struct ArenaIdx<T>(NonZeroUsize, std::marker::PhantomData<fn() -> T>);

impl<T> ArenaIdx<T> {
    fn from_usize(id: usize) -> ArenaIdx<T> {
        ArenaIdx(
            NonZeroUsize::new(id + 1).expect("overflow"),
            std::marker::PhantomData,
        )
    }

    fn as_index(self) -> usize {
        self.0.get() - 1
    }
}

impl<T> fmt::Debug for ArenaIdx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_index())
    }
}

impl<T> fmt::Display for ArenaIdx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_index())
    }
}

impl<T> Clone for ArenaIdx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaIdx<T> {}

impl<T> PartialEq for ArenaIdx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for ArenaIdx<T> {}

impl<T> std::hash::Hash for ArenaIdx<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// A vector of slots addressed by [`ArenaIdx`]. Released slots are recycled
/// by later allocations.
#[derive(Clone)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<usize>,
}

impl<T> Arena<T> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            slots: vec![],
            vacant: vec![],
        }
    }

    /// Allocates a new element and returns its index.
    pub fn alloc(&mut self, data: T) -> ArenaIdx<T> {
        match self.vacant.pop() {
            Some(id) => {
                self.slots[id] = Some(data);
                ArenaIdx::from_usize(id)
            }
            None => {
                let id = self.slots.len();
                self.slots.push(Some(data));
                ArenaIdx::from_usize(id)
            }
        }
    }

    /// Releases the element at the given index, returning it if the slot was
    /// occupied.
    pub fn release(&mut self, id: ArenaIdx<T>) -> Option<T> {
        let slot = self.slots.get_mut(id.as_index())?;
        let data = slot.take()?;
        self.vacant.push(id.as_index());
        Some(data)
    }

    /// Gets the element at the given index.
    pub fn get(&self, id: ArenaIdx<T>) -> Option<&T> {
        self.slots.get(id.as_index())?.as_ref()
    }

    /// Gets a mutable reference to the element at the given index.
    pub fn get_mut(&mut self, id: ArenaIdx<T>) -> Option<&mut T> {
        self.slots.get_mut(id.as_index())?.as_mut()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ArenaIdx<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| Some((ArenaIdx::from_usize(i), slot.as_ref()?)))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> std::ops::Index<ArenaIdx<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: ArenaIdx<T>) -> &T {
        self.get(id).expect("stale arena index")
    }
}

impl<T> std::ops::IndexMut<ArenaIdx<T>> for Arena<T> {
    fn index_mut(&mut self, id: ArenaIdx<T>) -> &mut T {
        self.get_mut(id).expect("stale arena index")
    }
}
