// The cursor that drives both construction and queries.
//
// A position in the tree is either explicit, sitting exactly on `current`
// (then `edge == current`), or implicit, `length` bytes into the incoming
// label of `edge`, which is a child of `current`. In the implicit case the
// next unconsumed byte is text[edge.start + length].
use log::trace;

use crate::types::node::{Node, NodeId};
use crate::types::text::Text;

pub(crate) struct ActivePoint<'t> {
    text: &'t Text,
    current: NodeId,
    edge: NodeId,
    // Internal node created by the last split, still waiting for its
    // suffix link. Holds at most one node and is cleared every phase.
    pending: Option<NodeId>,
    length: usize,
}

impl<'t> ActivePoint<'t> {
    pub fn new(text: &'t Text, start: NodeId) -> Self {
        ActivePoint {
            text,
            current: start,
            edge: start,
            pending: None,
            length: 0,
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_explicit(&self) -> bool {
        self.current == self.edge
    }

    pub fn reset_pending(&mut self) {
        self.pending = None;
    }

    pub fn take_pending(&mut self) -> Option<NodeId> {
        self.pending.take()
    }

    /// Whether the position can be extended by `x` without changing the tree.
    pub fn has_move(&self, nodes: &[Node], x: u8) -> bool {
        if self.is_explicit() {
            nodes[self.current].has_child(x)
        } else {
            self.text.at(nodes[self.edge].start + self.length) == x
        }
    }

    /// Consumes `x`. Only valid after `has_move(x)` returned true.
    pub fn advance(&mut self, nodes: &[Node], x: u8) {
        if self.is_explicit() {
            let child = nodes[self.current]
                .child(x)
                .unwrap_or_else(|| panic!("no child for byte 0x{:02x} after a checked move", x));
            self.enter(nodes, child);
        } else {
            self.length += 1;
            if self.length == nodes[self.edge].length() {
                self.current = self.edge;
                self.length = 0;
            }
        }
    }

    // Steps onto the first byte of the edge leading into `child`
    fn enter(&mut self, nodes: &[Node], child: NodeId) {
        if nodes[child].length() == 1 {
            self.current = child;
            self.edge = child;
            self.length = 0;
        } else {
            self.edge = child;
            self.length = 1;
        }
    }

    /// Moves down to the end of the current edge, or, when explicit, to the
    /// end of the edge with the smallest leading byte. Does nothing on a
    /// leaf. Repeating this reaches a leaf below the current position.
    pub fn move_anywhere(&mut self, nodes: &[Node]) {
        if self.is_explicit() {
            match nodes[self.current].first_child() {
                Some(child) => {
                    self.current = child;
                    self.edge = child;
                }
                None => return,
            }
        } else {
            self.current = self.edge;
        }
        self.length = 0;
    }

    /// Adds the leaf for the suffix starting at `leaf_id`, ending in text[i..].
    /// When the position is implicit the edge is split first, and the new
    /// internal node becomes the pending node for the next extension.
    pub fn create_edge(&mut self, nodes: &mut Vec<Node>, i: usize, leaf_id: usize) {
        let text = self.text;
        let leaf = nodes.len();
        nodes.push(Node::leaf(leaf_id, i, text.len()));

        if self.is_explicit() {
            nodes[self.current].children.insert(text.at(i), leaf);

            if let Some(pending) = self.pending.take() {
                nodes[pending].suffix_link = Some(self.current);
            }
        } else {
            let old = self.edge;
            let start = nodes[old].start;
            let split_at = start + self.length;

            let inner = nodes.len();
            nodes.push(Node::new(start, split_at, None));
            nodes[old].start = split_at;
            nodes[inner].children.insert(text.at(split_at), old);
            nodes[inner].children.insert(text.at(i), leaf);
            nodes[self.current].children.insert(text.at(start), inner);
            trace!(
                "Split edge {}..{} at {} for suffix {}",
                start,
                nodes[old].end,
                split_at,
                leaf_id
            );

            if let Some(pending) = self.pending {
                nodes[pending].suffix_link = Some(inner);
            }
            self.pending = Some(inner);
            self.edge = inner;
        }
    }

    /// Moves to the same position one suffix shorter, by following the
    /// suffix link of `current` and walking the label of `edge` back down
    /// from there. Only whole edges are skipped, so the walk costs one
    /// step per node passed rather than one per byte.
    pub fn suf(&mut self, nodes: &[Node]) {
        let link = nodes[self.current]
            .suffix_link
            .unwrap_or_else(|| panic!("node {} has no suffix link", self.current));

        if self.is_explicit() {
            self.current = link;
            self.edge = link;
            self.length = 0;
            return;
        }

        let mut start = nodes[self.edge].start;
        let mut remaining = nodes[self.edge].length();
        self.current = link;
        self.edge = link;
        self.length = 0;

        while remaining > 0 {
            let b = self.text.at(start);
            let next = nodes[self.current]
                .child(b)
                .unwrap_or_else(|| panic!("suffix walk lost at byte 0x{:02x}", b));
            let next_length = nodes[next].length();

            if next_length > remaining {
                self.edge = next;
                self.length = remaining;
                remaining = 0;
            } else {
                self.current = next;
                self.edge = next;
                remaining -= next_length;
                start += next_length;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // pre-root (0) and root (1), with a single edge "abc$" below the root
    fn single_edge(text: &Text) -> Vec<Node> {
        let mut nodes = vec![Node::new(0, 0, None), Node::new(0, 1, Some(0))];
        nodes.push(Node::leaf(0, 0, text.len()));
        nodes[1].children.insert(b'a', 2);
        for &b in text.as_bytes() {
            nodes[0].children.insert(b, 1);
        }
        nodes
    }

    #[test]
    fn moves_along_an_edge() {
        let text = Text::new(b"abc", b'$').unwrap();
        let nodes = single_edge(&text);
        let mut point = ActivePoint::new(&text, 1);

        assert!(point.has_move(&nodes, b'a'));
        assert!(!point.has_move(&nodes, b'b'));
        point.advance(&nodes, b'a');
        assert!(!point.is_explicit());
        assert_eq!(1, point.current());

        assert!(point.has_move(&nodes, b'b'));
        point.advance(&nodes, b'b');
        point.advance(&nodes, b'c');
        point.advance(&nodes, b'$');
        assert!(point.is_explicit());
        assert_eq!(2, point.current());
        assert!(!point.has_move(&nodes, b'a'));
    }

    #[test]
    fn split_creates_pending_node() {
        let text = Text::new(b"abc", b'$').unwrap();
        let mut nodes = single_edge(&text);
        let mut point = ActivePoint::new(&text, 1);
        point.advance(&nodes, b'a');
        point.advance(&nodes, b'b');

        // Pretend the next byte is '$' at offset 3 where "abc" continues with 'c'
        point.create_edge(&mut nodes, 3, 1);
        let inner = point.take_pending().unwrap();

        assert_eq!(Some(inner), nodes[1].child(b'a'));
        assert_eq!(2, nodes[inner].length());
        assert_eq!(Some(2), nodes[inner].child(b'c'));
        assert_eq!(2, nodes[2].start);
        let leaf = nodes[inner].child(b'$').unwrap();
        assert_eq!(Some(1), nodes[leaf].suffix_index);
        assert_eq!(3..4, nodes[leaf].start..nodes[leaf].end);
    }

    #[test]
    fn suf_from_root_goes_through_pre_root() {
        let text = Text::new(b"abc", b'$').unwrap();
        let nodes = single_edge(&text);
        let mut point = ActivePoint::new(&text, 1);

        point.suf(&nodes);
        assert_eq!(0, point.current());
        assert!(!point.has_move(&nodes, b'z'));
        assert!(point.has_move(&nodes, b'c'));
        point.advance(&nodes, b'c');
        assert_eq!(1, point.current());
        assert!(point.is_explicit());
    }

    #[test]
    fn move_anywhere_stops_at_leaf() {
        let text = Text::new(b"abc", b'$').unwrap();
        let nodes = single_edge(&text);
        let mut point = ActivePoint::new(&text, 1);

        point.move_anywhere(&nodes);
        assert_eq!(2, point.current());
        assert!(nodes[point.current()].is_leaf());
        point.move_anywhere(&nodes);
        assert_eq!(2, point.current());
    }
}
