use std::{fmt, rc::Rc};

/// A non-empty, persistent sequence of values.
///
/// Pushing returns a new history that shares every earlier entry with the receiver; the
/// receiver itself is never modified. This makes keeping the full record of a run cheap even
/// though every tick produces a new snapshot.
///
/// ```
/// use qtris_engine::History;
///
/// let start = History::new(0);
/// let later = start.push(1).push(2);
///
/// assert_eq!(later.len(), 3);
/// assert_eq!(*later.last(), 2);
/// assert_eq!(start.len(), 1);
/// assert_eq!(later.iter().copied().collect::<Vec<_>>(), [2, 1, 0]);
/// ```
pub struct History<T> {
    head: Rc<Node<T>>,
}

struct Node<T> {
    value: T,
    parent: Option<Rc<Node<T>>>,
    len: usize,
}

impl<T> Drop for Node<T> {
    // unlink iteratively; dropping a long chain recursively would overflow the stack
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Rc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            head: Rc::clone(&self.head),
        }
    }
}

impl<T> History<T> {
    /// Starts a history with a single entry.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            head: Rc::new(Node {
                value,
                parent: None,
                len: 1,
            }),
        }
    }

    /// Returns this history extended by `value`.
    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Rc::new(Node {
                value,
                parent: Some(Rc::clone(&self.head)),
                len: self.head.len + 1,
            }),
        }
    }

    /// Returns the newest entry.
    #[must_use]
    pub fn last(&self) -> &T {
        &self.head.value
    }

    /// Returns the history without its newest entry, or `None` if only one entry is left.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        self.head.parent.clone().map(|head| Self { head })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len
    }

    /// Always `false`: a history holds at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates from the newest entry to the oldest.
    #[must_use]
    pub fn iter(&self) -> HistoryIter<'_, T> {
        HistoryIter {
            next: Some(&*self.head),
        }
    }

    /// Checks whether both histories end in the very same entry.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.head, &other.head)
    }
}

impl<T: PartialEq> PartialEq for History<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = &'a T;
    type IntoIter = HistoryIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`History`], newest entry first.
#[derive(Debug)]
pub struct HistoryIter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("len", &self.len).finish_non_exhaustive()
    }
}

impl<'a, T> Iterator for HistoryIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.next.map_or(0, |node| node.len);
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for HistoryIter<'_, T> {}
