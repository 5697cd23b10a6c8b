#[cfg(test)]
mod tests {
    use crate::compiler::ast::{Program, Resolution};
    use crate::compiler::lexer::tokenize;
    use crate::compiler::macros::expand;
    use crate::compiler::parser::parse;
    use crate::compiler::semantics::{resolve, LinkError};

    fn run(text: &str) -> (Program, Vec<LinkError>) {
        let lexed = tokenize(text);
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        let expanded = expand(&lexed.tokens, lexed.macros);
        let mut parsed = parse(&expanded.tokens);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let errors = resolve(&mut parsed.program);
        (
            parsed.program,
            errors.into_iter().map(|e| e.into_inner()).collect(),
        )
    }

    /// The label key each reference resolved to, in source order
    fn targets(program: &Program) -> Vec<Option<String>> {
        program
            .references()
            .map(|(_, r)| match r.resolution {
                Resolution::Resolved(id) => program.statement(id).label.clone(),
                Resolution::Unresolved { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_forward_and_backward_references() {
        let (program, errors) = run("start: pc = :end\nend: pc = :start");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            targets(&program),
            vec![Some("0!end".into()), Some("0!start".into())]
        );
    }

    #[test]
    fn test_scope_fallback() {
        let text = "
            #push
                loop: !done
                pc = :loop
                #push
                    pc = :loop
                #pop
            #pop
            pc = :loop
        ";
        let (program, errors) = run(text);
        assert_eq!(errors, vec![LinkError::LabelNotFound("loop".into())]);
        assert_eq!(
            targets(&program),
            vec![Some("0.1!loop".into()), Some("0.1!loop".into()), None]
        );
    }

    #[test]
    fn test_inner_label_shadows_outer() {
        let text = "
            loop: !done
            #push
                loop: !pause
                pc = :loop
            #pop
            pc = :loop
        ";
        let (program, errors) = run(text);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            targets(&program),
            vec![Some("0.1!loop".into()), Some("0!loop".into())]
        );
    }

    #[test]
    fn test_sibling_scopes_are_isolated() {
        let text = "
            #push x: !done #pop
            #push pc = :x #pop
        ";
        let (_, errors) = run(text);
        assert_eq!(errors, vec![LinkError::LabelNotFound("x".into())]);
    }

    #[test]
    fn test_references_inside_data() {
        let (program, errors) = run("table: [:a :b [:a]] a: !done b: !halt c = :table");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            targets(&program),
            vec![
                Some("0!a".into()),
                Some("0!b".into()),
                Some("0!a".into()),
                Some("0!table".into())
            ]
        );
    }

    #[test]
    fn test_every_missing_label_is_reported() {
        let (_, errors) = run("pc = :nowhere\na = :missing");
        assert_eq!(
            errors,
            vec![
                LinkError::LabelNotFound("nowhere".into()),
                LinkError::LabelNotFound("missing".into())
            ]
        );
    }
}
