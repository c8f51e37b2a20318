use std::collections::BTreeMap;

pub type NodeId = usize;
// BTreeMap so that children are always visited by ascending byte,
// which keeps `find` and the tree dump reproducible. A node can never
// have more than 256 children, so lookups stay cheap.
pub type Tree = BTreeMap<u8, NodeId>;

#[derive(Debug)]
pub struct Node {
  pub children: Tree,
  // Never an ownership edge, only used to jump between nodes while
  // building. Points at the pre-root for the root itself.
  pub suffix_link: Option<NodeId>,

  // Incoming edge label as the half-open range text[start..end]
  pub start: usize,
  pub end: usize,

  // Some for leaves only. The offset in the text at which the suffix
  // ending in this leaf starts, i.e. text[suffix_index..] spells the
  // whole root-to-leaf path.
  pub suffix_index: Option<usize>,
}

impl Node {
  pub fn new(start: usize, end: usize, suffix_link: Option<NodeId>) -> Node {
    Node {
      children: BTreeMap::new(),
      suffix_link,
      start,
      end,
      suffix_index: None,
    }
  }

  // Leaves run to the end of the text from the moment they are created,
  // since the whole text is known before construction starts.
  pub fn leaf(suffix_index: usize, start: usize, end: usize) -> Node {
    Node {
      children: BTreeMap::new(),
      suffix_link: None,
      start,
      end,
      suffix_index: Some(suffix_index),
    }
  }

  pub fn has_child(&self, b: u8) -> bool {
    self.children.contains_key(&b)
  }

  pub fn child(&self, b: u8) -> Option<NodeId> {
    self.children.get(&b).copied()
  }

  // The child with the smallest leading byte
  pub fn first_child(&self) -> Option<NodeId> {
    self.children.values().next().copied()
  }

  pub fn children(&self) -> &Tree {
    &self.children
  }

  // A node is a leaf if it has no children
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  pub fn length(&self) -> usize {
    self.end - self.start
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leaf_has_index_and_no_children() {
    let leaf = Node::leaf(3, 3, 7);
    assert!(leaf.is_leaf());
    assert_eq!(Some(3), leaf.suffix_index);
    assert_eq!(4, leaf.length());
    assert_eq!(None, leaf.suffix_link);
  }

  #[test]
  fn first_child_is_smallest_byte() {
    let mut node = Node::new(0, 2, None);
    node.children.insert(b'b', 4);
    node.children.insert(b'$', 9);
    node.children.insert(b'a', 2);

    assert!(!node.is_leaf());
    assert_eq!(Some(9), node.first_child());
    assert_eq!(Some(2), node.child(b'a'));
    assert!(node.has_child(b'b'));
    assert!(!node.has_child(b'c'));
  }
}
