//! A suffix tree over a fixed byte text, built in linear time with
//! Ukkonen's algorithm.
//!
//! ```
//! use suffix_tree::SuffixTree;
//!
//! let st = SuffixTree::from_text("abcabcabc").unwrap();
//! assert!(st.contains("cabca").unwrap());
//! assert_eq!(None, st.find("xyz").unwrap());
//! ```

// All nodes live in one vector and refer to each other by index, so
// suffix links are never ownership edges and dropping the tree is flat.
// Construction is split between this orchestrator and the active point,
// which carries all of the per-step state.
use std::fmt;
use std::io::{self, Write};

use log::debug;

mod active_point;
mod error;
mod types;

use active_point::ActivePoint;
pub use error::{Result, SuffixTreeError};
pub use types::node::{Node, NodeId};
pub use types::text::{Text, DEFAULT_TERMINATOR};

// Following the suffix link of the root lands on the pre-root, which has
// an edge back to the root for every byte seen so far. The root edge has
// length 1, so going through the pre-root drops exactly one byte.
const PRE_ROOT: NodeId = 0;
const ROOT: NodeId = 1;

pub struct SuffixTree {
    text: Text,
    nodes: Vec<Node>,
    built: bool,
}

impl SuffixTree {
    /// Prepares a tree over `input` terminated by [`DEFAULT_TERMINATOR`].
    /// [`build`](SuffixTree::build) has to be called before querying it.
    pub fn new<S: AsRef<[u8]>>(input: S) -> Result<SuffixTree> {
        SuffixTree::with_terminator(input, DEFAULT_TERMINATOR)
    }

    /// Like [`new`](SuffixTree::new), with a custom terminator. Fails if the
    /// terminator occurs in `input`.
    pub fn with_terminator<S: AsRef<[u8]>>(input: S, terminator: u8) -> Result<SuffixTree> {
        let text = Text::new(input.as_ref(), terminator)?;
        let mut nodes = Vec::with_capacity(2 * text.len() + 2);
        nodes.push(Node::new(0, 0, None));
        nodes.push(Node::new(0, 1, Some(PRE_ROOT)));

        Ok(SuffixTree {
            text,
            nodes,
            built: false,
        })
    }

    /// Creates and builds a tree over `input` in one go.
    pub fn from_text<S: AsRef<[u8]>>(input: S) -> Result<SuffixTree> {
        let mut st = SuffixTree::new(input)?;
        st.build()?;
        Ok(st)
    }

    /// Runs the construction. Can only be done once per tree.
    pub fn build(&mut self) -> Result<()> {
        if self.built {
            return Err(SuffixTreeError::AlreadyBuilt);
        }

        let text = &self.text;
        let nodes = &mut self.nodes;
        let mut point = ActivePoint::new(text, ROOT);
        // Leaves are created in order of the suffix they end, so the
        // count so far is also the start offset of the next leaf's suffix
        let mut leaves = 0;

        for i in 0..text.len() {
            let x = text.at(i);
            nodes[PRE_ROOT].children.insert(x, ROOT);
            point.reset_pending();

            // Rule 2 until the suffix is implicitly present (rule 3),
            // which at the latest happens on the pre-root
            while !point.has_move(nodes, x) {
                point.create_edge(nodes, i, leaves);
                leaves += 1;
                point.suf(nodes);
            }

            if let Some(pending) = point.take_pending() {
                nodes[pending].suffix_link = Some(point.current());
            }
            point.advance(nodes, x);
        }

        self.built = true;
        debug!(
            "Built suffix tree over {} bytes with {} nodes",
            self.text.len(),
            self.node_count()
        );
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Whether `query` occurs anywhere in the text. The empty query always
    /// does.
    pub fn contains<Q: AsRef<[u8]>>(&self, query: Q) -> Result<bool> {
        Ok(self.walk(query.as_ref())?.is_some())
    }

    /// An offset at which `query` occurs in the text, or `None` when it
    /// does not occur. When there are several occurrences the same one is
    /// returned on every call.
    pub fn find<Q: AsRef<[u8]>>(&self, query: Q) -> Result<Option<usize>> {
        let mut point = match self.walk(query.as_ref())? {
            Some(point) => point,
            None => return Ok(None),
        };

        while !self.nodes[point.current()].is_leaf() {
            point.move_anywhere(&self.nodes);
        }

        let leaf = &self.nodes[point.current()];
        let offset = leaf
            .suffix_index
            .unwrap_or_else(|| panic!("leaf {} has no suffix index", point.current()));
        Ok(Some(offset))
    }

    // Follows `query` down from the root, returning where it ended up
    fn walk(&self, query: &[u8]) -> Result<Option<ActivePoint<'_>>> {
        if !self.built {
            return Err(SuffixTreeError::NotBuilt);
        }

        let mut point = ActivePoint::new(&self.text, ROOT);
        for &b in query {
            if !point.has_move(&self.nodes, b) {
                return Ok(None);
            }
            point.advance(&self.nodes, b);
        }
        Ok(Some(point))
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn terminator(&self) -> u8 {
        self.text.terminator()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    // Ids index the internal arena, which also holds the pre-root
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        // Everything except the pre-root
        self.nodes.len() - 1
    }

    /// The suffix index of every leaf, in ascending order.
    pub fn leaf_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.nodes[ROOT..]
            .iter()
            .filter_map(|n| n.suffix_index)
            .collect();
        ids.sort_unstable();
        ids
    }

    // Gets the printable label going into the node
    pub fn label_of_node_formatted(&self, node: &Node) -> String {
        self.text.as_readable(node.start, node.end)
    }

    /// Dumps the tree to stdout, see the `Debug` impl.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write!(out, "{:?}", self)
    }
}

impl fmt::Debug for SuffixTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "SUFFIX TREE")?;
        writeln!(f, "text: {:?}", self.text)?;
        writeln!(f, "ROOT")?;

        // Explicit stack, since a tree over a long repetitive text is
        // about as deep as the text is long. Children are pushed in
        // reverse so they are printed by ascending byte.
        let mut stack: Vec<(NodeId, usize)> = self
            .root()
            .children()
            .values()
            .rev()
            .map(|&child| (child, 1))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            let indent = " ".repeat(depth * 2);
            match node.suffix_index {
                Some(index) => writeln!(
                    f,
                    "{}{:?} ({})",
                    indent,
                    self.label_of_node_formatted(node),
                    index
                )?,
                None => writeln!(f, "{}{:?}", indent, self.label_of_node_formatted(node))?,
            }
            stack.extend(node.children().values().rev().map(|&child| (child, depth + 1)));
        }

        writeln!(f, "-----------------------------------------")
    }
}
