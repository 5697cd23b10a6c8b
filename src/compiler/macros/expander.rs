use std::collections::HashSet;

use log::{debug, trace};

use crate::compiler::diagnostics::Annotation;
use crate::compiler::lexer::{Token, TokenKind};
use crate::compiler::source::{Position, Span};
use crate::compiler::CompilerError;

use super::{Macro, MacroError, MacroScopes, ScopeId};

/// Calls nested deeper than this are not expanded.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Expansion annotations longer than this are cut off.
const ANNOTATION_LIMIT: usize = 50;

#[derive(Debug, Default)]
pub struct ExpansionOutput {
    /// The token sequence with every macro call replaced by its expansion
    pub tokens: Vec<Token>,
    pub errors: Vec<CompilerError<MacroError>>,
    /// Signatures and expansions of the calls, for tooling
    pub annotations: Vec<Annotation>,
}

/// Expands every macro call in `tokens`, using `macros` as the root scope.
pub fn expand(tokens: &[Token], macros: Vec<Macro>) -> ExpansionOutput {
    let mut expander = MacroExpander::new(macros);
    let root = expander.scopes.root();
    let tokens = expander.expand_sequence(tokens, root, &[], true, 0);

    debug!(
        "Macro expansion produced {} tokens using {} scopes, with {} errors",
        tokens.len(),
        expander.scopes.scope_count(),
        expander.errors.len()
    );

    ExpansionOutput {
        tokens,
        errors: expander.errors,
        annotations: expander.annotations,
    }
}

struct MacroExpander {
    scopes: MacroScopes,
    errors: Vec<CompilerError<MacroError>>,
    annotations: Vec<Annotation>,
    /// Call sites which already have a signature annotation
    annotated: HashSet<Position>,
}

impl MacroExpander {
    fn new(macros: Vec<Macro>) -> MacroExpander {
        MacroExpander {
            scopes: MacroScopes::new(macros),
            errors: vec![],
            annotations: vec![],
            annotated: HashSet::new(),
        }
    }

    fn error(&mut self, span: Span, kind: MacroError) {
        trace!("{} {:?}", span, kind);
        self.errors.push(CompilerError::new(span, kind));
    }

    /// Returns a copy of `tokens` with every call expanded in `scope`.
    /// `call_stack` names the macros whose bodies are being expanded.
    fn expand_sequence(
        &mut self,
        tokens: &[Token],
        scope: ScopeId,
        call_stack: &[String],
        root: bool,
        depth: usize,
    ) -> Vec<Token> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::Macro => {
                    let (next, expansion) =
                        self.expand_call(tokens, i, scope, call_stack, root, depth);
                    out.extend(expansion);
                    i = next;
                }
                TokenKind::MacroArgStart | TokenKind::MacroArgEnd => {
                    self.error(token.span, MacroError::UnexpectedArgumentDelimiter);
                    i += 1;
                }
                _ => {
                    out.push(token.clone());
                    i += 1;
                }
            }
        }
        out
    }

    /// Expands the call whose name is at `tokens[start]`.  Returns the index
    /// just past the call and the tokens it expands to.  A call which cannot
    /// be expanded expands to nothing.
    fn expand_call(
        &mut self,
        tokens: &[Token],
        start: usize,
        scope: ScopeId,
        call_stack: &[String],
        root: bool,
        depth: usize,
    ) -> (usize, Vec<Token>) {
        let name = tokens[start].text.clone();
        let span = tokens[start].span;

        let (definition, def_scope) = match self.scopes.lookup(scope, &name) {
            Some(found) => found,
            None => {
                self.error(span, MacroError::UnknownMacro(name));
                return (start + 1, vec![]);
            }
        };

        let (next, arguments) =
            match self.collect_arguments(tokens, start, scope, call_stack, root, depth) {
                (next, Some(arguments)) => (next, arguments),
                (next, None) => return (next, vec![]),
            };

        // Arguments are bound as leaves and can never expand to themselves
        if !self.scopes.is_argument_scope(def_scope) && call_stack.contains(&name) {
            self.error(
                span,
                MacroError::RecursiveExpansion(name, call_stack.to_vec()),
            );
            return (next, vec![]);
        }

        if depth >= MAX_EXPANSION_DEPTH {
            self.error(span, MacroError::ExpansionTooDeep(name));
            return (next, vec![]);
        }

        if arguments.len() != definition.params.len() {
            self.error(
                span,
                MacroError::ArityMismatch(name, definition.params.clone(), arguments.len()),
            );
            return (next, vec![]);
        }

        if !arguments.is_empty() && self.annotated.insert(span.from()) {
            self.annotations.push(Annotation::new(span, &definition.signature()));
        }

        let body_scope = if arguments.is_empty() {
            def_scope
        } else {
            let bindings = definition
                .params
                .iter()
                .zip(arguments)
                .map(|(param, body)| Macro {
                    name: param.clone(),
                    params: vec![],
                    body,
                    span,
                })
                .collect();
            self.scopes.push_arguments(def_scope, bindings)
        };

        let mut stack = call_stack.to_vec();
        stack.push(name.clone());
        let body = self.expand_sequence(&definition.body, body_scope, &stack, false, depth + 1);

        if root {
            let text = body
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            self.annotations.push(Annotation::new(
                span,
                &format!("  Expands to {}", limit_length(&text)),
            ));
        }

        trace!("{} {} expanded to {} tokens", span, name, body.len());
        (next, body)
    }

    /// Reads the argument list following the macro name at `tokens[start]`.
    /// Each token is one argument unless it is grouped with others inside
    /// `( ... )`.  Calls inside the list are expanded in the caller's scope.
    /// Returns None if the list is never closed.
    fn collect_arguments(
        &mut self,
        tokens: &[Token],
        start: usize,
        scope: ScopeId,
        call_stack: &[String],
        root: bool,
        depth: usize,
    ) -> (usize, Option<Vec<Vec<Token>>>) {
        let mut arguments: Vec<Vec<Token>> = vec![];
        let mut i = start + 1;
        if tokens.get(i).map(|t| t.kind) != Some(TokenKind::MacroArgStart) {
            return (i, Some(arguments));
        }
        i += 1;

        let mut group = false;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::MacroArgStart => {
                    if group {
                        self.error(token.span, MacroError::NestedGroup);
                    } else {
                        arguments.push(vec![]);
                        group = true;
                    }
                    i += 1;
                }
                TokenKind::MacroArgEnd => {
                    i += 1;
                    if group {
                        group = false;
                    } else {
                        return (i, Some(arguments));
                    }
                }
                TokenKind::Macro => {
                    let (next, expansion) =
                        self.expand_call(tokens, i, scope, call_stack, root, depth);
                    argument_target(&mut arguments, group).extend(expansion);
                    i = next;
                }
                _ => {
                    argument_target(&mut arguments, group).push(token.clone());
                    i += 1;
                }
            }
        }

        self.error(
            tokens[start].span,
            MacroError::UnterminatedArguments(tokens[start].text.clone()),
        );
        (i, None)
    }
}

/// The argument the next token belongs to: the open group, or a new argument.
fn argument_target(arguments: &mut Vec<Vec<Token>>, group: bool) -> &mut Vec<Token> {
    if !group || arguments.is_empty() {
        arguments.push(vec![]);
    }
    let last = arguments.len() - 1;
    &mut arguments[last]
}

fn limit_length(text: &str) -> String {
    if text.chars().count() > ANNOTATION_LIMIT {
        let cut: String = text.chars().take(ANNOTATION_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.into()
    }
}
