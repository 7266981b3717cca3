use std::cmp::Ordering;

type Link = Option<Box<Node>>;

#[derive(Debug, Clone)]
struct Node {
    key: String,
    value: f64,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: String, value: f64) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i64 {
        height(&self.left) as i64 - height(&self.right) as i64
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

/// Promote the left child of `y` to the root of this subtree.
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Promote the right child of `x` to the root of this subtree.
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restore the AVL invariant at `node` after one of its subtrees grew by one.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        // left-right: straighten the left subtree first
        if node.left.as_ref().is_some_and(|l| l.balance() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // right-left
        if node.right.as_ref().is_some_and(|r| r.balance() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Insert into the subtree rooted at `link`. Returns the new subtree root and
/// the value previously stored under `key`, if any.
fn insert_at(link: Link, key: &str, value: f64) -> (Box<Node>, Option<f64>) {
    let Some(mut node) = link else {
        return (Node::leaf(key.to_string(), value), None);
    };

    match key.cmp(node.key.as_str()) {
        Ordering::Less => {
            let (child, old) = insert_at(node.left.take(), key, value);
            node.left = Some(child);
            if old.is_some() {
                return (node, old);
            }
            (rebalance(node), None)
        }
        Ordering::Greater => {
            let (child, old) = insert_at(node.right.take(), key, value);
            node.right = Some(child);
            if old.is_some() {
                return (node, old);
            }
            (rebalance(node), None)
        }
        Ordering::Equal => {
            let old = std::mem::replace(&mut node.value, value);
            (node, Some(old))
        }
    }
}

/// Balanced binary search tree (AVL) from string keys to `f64` values.
///
/// Ordering is by key only, using byte-wise `str` comparison, never by value.
/// Inserting an existing key overwrites its value in place. There is no
/// removal; the tree only grows.
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex {
    root: Link,
    len: usize,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update `key`. Returns the previous value when the key was
    /// already present, in which case the tree shape and size are unchanged.
    pub fn insert(&mut self, key: &str, value: f64) -> Option<f64> {
        let (root, old) = insert_at(self.root.take(), key, value);
        self.root = Some(root);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    fn find(&self, key: &str) -> Option<&Node> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.find(key).map(|n| n.value)
    }

    /// Lookup with the zero sentinel for a missing key.
    ///
    /// Indistinguishable from a stored 0.0; prefer [`OrderedIndex::get`].
    pub fn get_or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// In-order iterator: ascending by key.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), false)
    }

    /// Reverse in-order iterator: descending by key.
    pub fn iter_rev(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), true)
    }

    /// All entries, strictly ascending by key.
    pub fn sorted(&self) -> Vec<(String, f64)> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    /// All entries, strictly descending by key.
    pub fn sorted_reverse(&self) -> Vec<(String, f64)> {
        self.iter_rev().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        fn walk(link: &Link) -> u32 {
            let Some(node) = link else { return 0 };
            let lh = walk(&node.left);
            let rh = walk(&node.right);
            assert!(
                (lh as i64 - rh as i64).abs() <= 1,
                "unbalanced at {}: left {} right {}",
                node.key,
                lh,
                rh
            );
            assert_eq!(node.height, 1 + lh.max(rh), "stale height at {}", node.key);
            if let Some(l) = &node.left {
                assert!(l.key < node.key);
            }
            if let Some(r) = &node.right {
                assert!(r.key > node.key);
            }
            1 + lh.max(rh)
        }
        walk(&self.root);
    }
}

/// Borrowing in-order iterator over an [`OrderedIndex`].
///
/// Holds at most one pending node per tree level, so its stack stays
/// O(log n).
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    reverse: bool,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>, reverse: bool) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            reverse,
        };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut current: Option<&'a Node>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = if self.reverse {
                node.right.as_deref()
            } else {
                node.left.as_deref()
            };
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let next = if self.reverse {
            node.left.as_deref()
        } else {
            node.right.as_deref()
        };
        self.descend(next);
        Some((node.key.as_str(), node.value))
    }
}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = (&'a str, f64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
