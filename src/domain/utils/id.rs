use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Stable, user visible integer identifier.
///
/// The tag type `T` keeps task ids and node ids apart at compile time, while the
/// numeric value is what gets printed in reports ("G3", "N1", ...).
pub struct Id<T> {
    pub value: u32,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub const fn new(value: u32) -> Self {
        Id { value, _marker: PhantomData }
    }
}

// Manual impls: derives would put bounds on the tag type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> From<u32> for Id<T> {
    fn from(value: u32) -> Self {
        Id::new(value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {}", display_name, self.value)
    }
}

/// Hands out ids for one construction context (a task graph or a topology).
///
/// Explicitly inserted ids are reported through [`IdAllocator::observe`], so freshly
/// allocated ids never collide with them.
#[derive(Debug)]
pub struct IdAllocator<T> {
    next: u32,
    _marker: PhantomData<T>,
}

impl<T> IdAllocator<T> {
    pub fn new() -> Self {
        Self { next: 0, _marker: PhantomData }
    }

    pub fn allocate(&mut self) -> Id<T> {
        let id = Id::new(self.next);
        self.next += 1;
        id
    }

    /// Moves the allocator past an id that was assigned from outside.
    pub fn observe(&mut self, id: Id<T>) {
        if id.value >= self.next {
            self.next = id.value + 1;
        }
    }

    pub fn peek(&self) -> Id<T> {
        Id::new(self.next)
    }
}

impl<T> Default for IdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for IdAllocator<T> {
    fn clone(&self) -> Self {
        Self { next: self.next, _marker: PhantomData }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TaskTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;

pub type TaskId = Id<TaskTag>;
pub type NodeId = Id<NodeTag>;
