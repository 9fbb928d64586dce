//! List nesting state machine.

/// Whitespace emitted per nesting level.
const INDENT_UNIT: &str = "  ";

/// Kind of list a stack frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug)]
struct Frame {
    kind: ListKind,
    /// Whether an ordered run was active when this frame was pushed;
    /// restored on pop so a nested descent cannot break sibling numbering.
    resume_ordered: bool,
}

/// Tracks list nesting depth and ordered-list numbering across a sibling
/// and child block traversal.
///
/// Created fresh per document render; must never be shared across renders.
/// Invariants: stack depth equals indentation level, and each ordered
/// counter is scoped to one nesting depth, so nested ordered lists restart
/// at 1 while their parent run continues where it left off.
#[derive(Debug, Default)]
pub struct ListContext {
    stack: Vec<Frame>,
    /// One counter per nesting depth; index equals the depth items render at.
    counters: Vec<u32>,
    in_ordered_run: bool,
}

impl ListContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Indentation prefix for an item at the current depth.
    #[must_use]
    pub fn indent(&self) -> String {
        INDENT_UNIT.repeat(self.depth())
    }

    /// Kind of the innermost frame, if any.
    #[must_use]
    pub fn top_kind(&self) -> Option<ListKind> {
        self.stack.last().map(|f| f.kind)
    }

    /// Record an unordered item at the current depth.
    ///
    /// Ends any ordered run: a numbered item after a bullet sibling starts
    /// numbering over.
    pub fn bullet_item(&mut self) {
        self.in_ordered_run = false;
    }

    /// Record an ordered item and return its number.
    ///
    /// Entering a numbered item outside an ordered run (from nothing, or
    /// from a different list kind) clears the stack and starts counting
    /// from 1. Within a run the counter for the current depth advances.
    pub fn ordered_item(&mut self) -> u32 {
        if !self.in_ordered_run {
            self.stack.clear();
            self.counters.clear();
            self.in_ordered_run = true;
        }
        let depth = self.depth();
        if self.counters.len() <= depth {
            self.counters.resize(depth + 1, 0);
        }
        self.counters[depth] += 1;
        self.counters[depth]
    }

    /// Descend into a list item's children.
    pub fn push(&mut self, kind: ListKind) {
        self.stack.push(Frame {
            kind,
            resume_ordered: self.in_ordered_run,
        });
    }

    /// Return from a list item's children, restoring the parent level.
    ///
    /// A no-op when the stack was cleared mid-descent by an ordered reset.
    pub fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.in_ordered_run = frame.resume_ordered;
        }
        // Deeper counters die with the frame so the next nested run restarts.
        self.counters.truncate(self.depth() + 1);
    }

    /// Reset to the empty state; list runs do not span non-list blocks.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.counters.clear();
        self.in_ordered_run = false;
    }
}
