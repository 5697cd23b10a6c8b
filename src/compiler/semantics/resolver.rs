use log::{debug, trace};

use crate::compiler::ast::{label_key, Program, RefId, Resolution, StatementId};
use crate::compiler::CompilerError;

use super::LinkError;

/// The outcome of one attempt to resolve a reference
enum Step {
    Resolved(StatementId),
    /// Not in this scope; the next attempt looks one scope further out
    Widened,
    NotFound,
}

/// Binds every reference in the program to the statement its label names.
///
/// Each pass tries every pending reference against the label table, starting
/// from the scope it was written in.  A miss moves the reference out one
/// scope for the next pass; a miss at the root scope is reported.  Passes
/// repeat until nothing is pending, and if a pass changes nothing the
/// remaining references are reported as unresolvable.
pub fn resolve(program: &mut Program) -> Vec<CompilerError<LinkError>> {
    let mut errors = vec![];
    let mut pending: Vec<RefId> = program
        .references()
        .filter(|(_, r)| matches!(r.resolution, Resolution::Unresolved { .. }))
        .map(|(id, _)| id)
        .collect();

    let mut pass = 0;
    while !pending.is_empty() {
        pass += 1;
        trace!("Resolution pass {} with {} references", pass, pending.len());

        let mut progress = false;
        let mut next = vec![];
        for rid in pending {
            match step(program, rid) {
                Step::Resolved(target) => {
                    progress = true;
                    program.reference_mut(rid).resolution = Resolution::Resolved(target);
                }
                Step::Widened => {
                    progress = true;
                    next.push(rid);
                }
                Step::NotFound => {
                    progress = true;
                    let r = program.reference(rid);
                    errors.push(CompilerError::new(
                        r.span,
                        LinkError::LabelNotFound(r.label.clone()),
                    ));
                }
            }
        }

        if !progress {
            for rid in next {
                let r = program.reference(rid);
                errors.push(CompilerError::new(
                    r.span,
                    LinkError::Unresolvable(r.label.clone()),
                ));
            }
            break;
        }
        pending = next;
    }

    debug!(
        "Resolved references in {} passes with {} errors",
        pass,
        errors.len()
    );
    errors
}

fn step(program: &mut Program, rid: RefId) -> Step {
    let (key, can_widen) = {
        let r = program.reference(rid);
        match &r.resolution {
            Resolution::Unresolved { scope_prefix } => {
                (label_key(scope_prefix, &r.label), scope_prefix.len() > 1)
            }
            Resolution::Resolved(target) => return Step::Resolved(*target),
        }
    };

    if let Some(target) = program.label(&key) {
        debug!("Resolved :{} to {}", program.reference(rid).label, key);
        return Step::Resolved(target);
    }

    if can_widen {
        if let Resolution::Unresolved { scope_prefix } = &mut program.reference_mut(rid).resolution
        {
            scope_prefix.pop();
        }
        Step::Widened
    } else {
        Step::NotFound
    }
}
