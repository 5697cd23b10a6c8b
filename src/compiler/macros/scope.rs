use std::collections::HashMap;
use std::rc::Rc;

use super::Macro;

/// Identifies one scope in a `MacroScopes` arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct MacroScope {
    bindings: HashMap<String, Rc<Macro>>,
    parent: Option<ScopeId>,
    /// True if this scope binds the arguments of a call
    arguments: bool,
}

/// Every macro scope created while expanding one compilation unit.  Scopes
/// form a chain from the innermost out to the root; a scope is never removed
/// so a `ScopeId` stays valid for the whole expansion.
#[derive(Debug)]
pub struct MacroScopes {
    scopes: Vec<MacroScope>,
}

impl MacroScopes {
    /// Creates the arena with a root scope holding the given definitions.  A
    /// later definition of the same name replaces an earlier one.
    pub fn new(macros: Vec<Macro>) -> MacroScopes {
        let bindings = macros
            .into_iter()
            .map(|m| (m.name.clone(), Rc::new(m)))
            .collect();
        MacroScopes {
            scopes: vec![MacroScope {
                bindings,
                parent: None,
                arguments: false,
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Adds a scope binding the arguments of a call as the child of `parent`.
    pub fn push_arguments(&mut self, parent: ScopeId, arguments: Vec<Macro>) -> ScopeId {
        let bindings = arguments
            .into_iter()
            .map(|m| (m.name.clone(), Rc::new(m)))
            .collect();
        self.scopes.push(MacroScope {
            bindings,
            parent: Some(parent),
            arguments: true,
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Looks `name` up from `scope` outwards.  Returns the macro and the scope
    /// it was found in.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(Rc<Macro>, ScopeId)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id.0];
            if let Some(m) = s.bindings.get(name) {
                return Some((m.clone(), id));
            }
            current = s.parent;
        }
        None
    }

    pub fn is_argument_scope(&self, scope: ScopeId) -> bool {
        self.scopes[scope.0].arguments
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod test_scopes {
    use super::*;
    use crate::compiler::source::Span;

    fn def(name: &str, params: &[&str]) -> Macro {
        Macro {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: vec![],
            span: Span::zero(),
        }
    }

    #[test]
    fn lookup_walks_out_to_root() {
        let mut scopes = MacroScopes::new(vec![def("INC", &["X"])]);
        let root = scopes.root();
        let inner = scopes.push_arguments(root, vec![def("X", &[])]);

        let (m, found) = scopes.lookup(inner, "INC").unwrap();
        assert_eq!(m.name, "INC");
        assert_eq!(found, root);

        let (_, found) = scopes.lookup(inner, "X").unwrap();
        assert_eq!(found, inner);
        assert!(scopes.is_argument_scope(found));

        assert!(scopes.lookup(root, "X").is_none());
    }

    #[test]
    fn later_definition_wins() {
        let scopes = MacroScopes::new(vec![def("M", &[]), def("M", &["A"])]);
        let (m, _) = scopes.lookup(scopes.root(), "M").unwrap();
        assert_eq!(m.params.len(), 1);
    }
}
