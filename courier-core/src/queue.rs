//! AVL-balanced ordered queue of pending deliveries.
//!
//! Entries are keyed by [`SequenceNumber`], so ascending key order is arrival
//! order. Each node exclusively owns its children; rotations only rewire the
//! links of the subtree being rebalanced. Both insertion and minimum removal
//! restore the height-balance invariant on the way back to the root.

use thiserror::Error;

use crate::SequenceNumber;

/// Errors returned by [`OrderedQueue::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The key is already present; keys must be unique.
    #[error("sequence number {key} is already queued")]
    DuplicateKey {
        /// Rejected key.
        key: SequenceNumber,
    },
}

type Link<V> = Option<Box<AvlNode<V>>>;

#[derive(Debug, Clone)]
struct AvlNode<V> {
    key: SequenceNumber,
    value: V,
    height: usize,
    left: Link<V>,
    right: Link<V>,
}

impl<V> AvlNode<V> {
    const fn leaf(key: SequenceNumber, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
    }

    /// Left height minus right height.
    fn balance_factor(&self) -> isize {
        signed(height(self.left.as_deref())) - signed(height(self.right.as_deref()))
    }
}

fn height<V>(node: Option<&AvlNode<V>>) -> usize {
    node.map_or(0, |n| n.height)
}

fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

fn rotate_right<V>(mut root: Box<AvlNode<V>>) -> Box<AvlNode<V>> {
    let Some(mut pivot) = root.left.take() else {
        return root;
    };
    root.left = pivot.right.take();
    root.update_height();
    pivot.right = Some(root);
    pivot.update_height();
    pivot
}

fn rotate_left<V>(mut root: Box<AvlNode<V>>) -> Box<AvlNode<V>> {
    let Some(mut pivot) = root.right.take() else {
        return root;
    };
    root.right = pivot.left.take();
    root.update_height();
    pivot.left = Some(root);
    pivot.update_height();
    pivot
}

/// Refresh `node`'s height and apply the single or double rotation that
/// brings its balance factor back into `-1..=1`.
fn rebalance<V>(mut node: Box<AvlNode<V>>) -> Box<AvlNode<V>> {
    node.update_height();
    let factor = node.balance_factor();
    if factor > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if factor < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

fn insert_into<V>(
    link: Link<V>,
    key: SequenceNumber,
    value: V,
) -> Result<Box<AvlNode<V>>, (Link<V>, QueueError)> {
    let Some(mut node) = link else {
        return Ok(Box::new(AvlNode::leaf(key, value)));
    };
    match key.cmp(&node.key) {
        std::cmp::Ordering::Less => match insert_into(node.left.take(), key, value) {
            Ok(child) => node.left = Some(child),
            Err((child, err)) => {
                node.left = child;
                return Err((Some(node), err));
            }
        },
        std::cmp::Ordering::Greater => match insert_into(node.right.take(), key, value) {
            Ok(child) => node.right = Some(child),
            Err((child, err)) => {
                node.right = child;
                return Err((Some(node), err));
            }
        },
        std::cmp::Ordering::Equal => return Err((Some(node), QueueError::DuplicateKey { key })),
    }
    Ok(rebalance(node))
}

/// Detach the leftmost node of `node`'s subtree, returning the remaining
/// subtree and the detached node.
fn remove_min<V>(mut node: Box<AvlNode<V>>) -> (Link<V>, Box<AvlNode<V>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, removed) = remove_min(left);
            node.left = rest;
            (Some(rebalance(node)), removed)
        }
    }
}

/// Ordered container of pending entries, smallest key first.
///
/// Keys are supplied by the caller, who is expected to hand out strictly
/// increasing sequence numbers; the queue only rejects duplicates.
///
/// # Examples
/// ```
/// use courier_core::{OrderedQueue, SequenceNumber};
///
/// # fn main() -> Result<(), courier_core::QueueError> {
/// let mut queue = OrderedQueue::new();
/// queue.insert(SequenceNumber::new(2), "second")?;
/// queue.insert(SequenceNumber::new(1), "first")?;
///
/// assert_eq!(queue.pop_min(), Some((SequenceNumber::new(1), "first")));
/// assert_eq!(queue.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OrderedQueue<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Default for OrderedQueue<V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<V> OrderedQueue<V> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` in `O(log n)`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::DuplicateKey`] when `key` is already present; the
    /// queue is left unchanged.
    pub fn insert(&mut self, key: SequenceNumber, value: V) -> Result<(), QueueError> {
        match insert_into(self.root.take(), key, value) {
            Ok(root) => {
                self.root = Some(root);
                self.len += 1;
                Ok(())
            }
            Err((root, err)) => {
                self.root = root;
                Err(err)
            }
        }
    }

    /// Remove and return the entry with the smallest key.
    ///
    /// Returns `None` when the queue is empty.
    pub fn pop_min(&mut self) -> Option<(SequenceNumber, V)> {
        let root = self.root.take()?;
        let (rest, removed) = remove_min(root);
        self.root = rest;
        self.len = self.len.saturating_sub(1);
        let AvlNode { key, value, .. } = *removed;
        Some((key, value))
    }

    /// Borrow the entry with the smallest key without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<(SequenceNumber, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((node.key, &node.value))
    }

    /// Iterate over entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Collect every entry in ascending key order.
    #[must_use]
    pub fn inorder(&self) -> Vec<(SequenceNumber, &V)> {
        self.iter().collect()
    }

    /// Number of queued entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the queue holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; zero when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        height(self.root.as_deref())
    }

    /// Whether every subtree satisfies the AVL balance invariant and carries
    /// an accurate height.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        fn check<V>(node: Option<&AvlNode<V>>) -> Option<usize> {
            let Some(n) = node else {
                return Some(0);
            };
            let left = check(n.left.as_deref())?;
            let right = check(n.right.as_deref())?;
            let actual = 1 + left.max(right);
            (left.abs_diff(right) <= 1 && actual == n.height).then_some(actual)
        }
        check(self.root.as_deref()).is_some()
    }
}

impl<'a, V> IntoIterator for &'a OrderedQueue<V> {
    type Item = (SequenceNumber, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`OrderedQueue`].
#[derive(Debug)]
pub struct Iter<'a, V> {
    stack: Vec<&'a AvlNode<V>>,
}

impl<'a, V> Iter<'a, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode<V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (SequenceNumber, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.key, &node.value))
    }
}
