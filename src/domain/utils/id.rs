use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Positional index of a topology element, tagged with the element kind so a
/// node index can never be passed where a link index is expected.
#[derive(Serialize)]
#[serde(transparent)]
pub struct Index<T> {
    pub index: usize,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Index<T> {
    pub const fn new(index: usize) -> Self {
        Index { index, _marker: PhantomData }
    }

    pub const fn get(self) -> usize {
        self.index
    }
}

// Manual impls: derives would put bounds on the tag type.
impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Index<T> {}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> From<usize> for Index<T> {
    fn from(index: usize) -> Self {
        Index::new(index)
    }
}

impl<T> From<Index<T>> for usize {
    fn from(index: Index<T>) -> Self {
        index.index
    }
}

impl<T> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Index");

        write!(f, "{}({})", display_name, self.index)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct LinkTag;

pub type NodeIndex = Index<NodeTag>;
pub type LinkIndex = Index<LinkTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_names_the_element_kind() {
        assert_eq!(format!("{:?}", NodeIndex::new(3)), "NodeIndex(3)");
        assert_eq!(format!("{:?}", LinkIndex::new(7)), "LinkIndex(7)");
        assert_eq!(NodeIndex::new(3).to_string(), "3");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&LinkIndex::new(4)).unwrap();
        assert_eq!(json, "4");
    }
}
