use crate::compiler::ast::label_key;

#[derive(Debug)]
struct ScopeFrame {
    id: u32,
    /// The id given to the most recently opened child of this scope
    last_child: u32,
}

/// The nested label namespaces opened by `#push` and closed by `#pop`.
/// Each scope is identified by its position among its siblings, so the path
/// of ids from the root names a scope uniquely for the whole program.
#[derive(Debug)]
pub struct LabelScopeStack {
    frames: Vec<ScopeFrame>,
}

impl LabelScopeStack {
    pub fn new() -> LabelScopeStack {
        LabelScopeStack {
            frames: vec![ScopeFrame {
                id: 0,
                last_child: 0,
            }],
        }
    }

    /// Opens a new child of the current scope.
    pub fn push(&mut self) {
        let parent = self
            .frames
            .last_mut()
            .expect("The label scope stack always holds the root scope");
        parent.last_child += 1;
        let id = parent.last_child;
        self.frames.push(ScopeFrame { id, last_child: 0 });
    }

    /// Closes the current scope.  Returns false if the current scope is the
    /// root, which cannot be closed.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// The ids of every open scope, outermost first
    pub fn prefix(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.id).collect()
    }

    /// The key a label named `name` is bound to in the current scope
    pub fn key(&self, name: &str) -> String {
        label_key(&self.prefix(), name)
    }
}

impl Default for LabelScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cannot_be_popped() {
        let mut stack = LabelScopeStack::new();
        assert!(!stack.pop());
        assert_eq!(stack.prefix(), vec![0]);
        assert_eq!(stack.key("loop"), "0!loop");
    }

    #[test]
    fn sibling_scopes_get_distinct_ids() {
        let mut stack = LabelScopeStack::new();
        stack.push();
        assert_eq!(stack.key("loop"), "0.1!loop");
        stack.push();
        assert_eq!(stack.prefix(), vec![0, 1, 1]);
        assert!(stack.pop());
        assert!(stack.pop());
        stack.push();
        assert_eq!(stack.key("loop"), "0.2!loop");
        stack.push();
        stack.pop();
        stack.push();
        assert_eq!(stack.key("x"), "0.2.2!x");
    }
}
