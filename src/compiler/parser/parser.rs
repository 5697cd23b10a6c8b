use std::convert::TryFrom;

use log::debug;
use stdext::function_name;

use crate::compiler::arch::{
    ConditionTarget, ControlAction, DestinationLocation, GeneralRegister, RegisterOp,
    SourceLocation, MAX_WORD_BITS, VALID_LOCATIONS,
};
use crate::compiler::ast::{Literal, Program, Statement, StatementKind};
use crate::compiler::lexer::tokens::parse_number;
use crate::compiler::lexer::{Token, TokenKind};
use crate::compiler::source::{SourceIr, Span};
use crate::compiler::CompilerError;

use super::tokenstream::TokenStream;
use super::{LabelScopeStack, ParserError, ParserResult};

/// Arrays nested deeper than this are rejected
pub const MAX_LITERAL_DEPTH: usize = 32;

/// The largest `~N`: the number of words the widest supported machine can
/// address
pub const MAX_LITERAL_LENGTH: usize = 1 << MAX_WORD_BITS;

/// Tokens which begin a literal
const LITERAL_START: [TokenKind; 4] = [
    TokenKind::Number,
    TokenKind::Reference,
    TokenKind::Str,
    TokenKind::ArrayStart,
];

macro_rules! trace {
    ($ts:expr) => {
        match $ts.peek() {
            None => log::trace!("{} <- EOF", function_name!()),
            Some(token) => log::trace!("{} <- {} {}", function_name!(), token.kind, token),
        }
    };
}

/*
    Grammar
    PROGRAM := STATEMENT*
    STATEMENT := LABEL* (MOVEMENT | CONDITION | ACTION | REGISTER_ACTION | DATA | #push | #pop)
    MOVEMENT := LOCATION [LITERAL] = (LOCATION [LITERAL] | LITERAL)
    DATA := STRING [~ NUMBER] | ARRAY [~ NUMBER]
    ARRAY := [ LITERAL* ]
    LITERAL := NUMBER | REFERENCE | STRING | ARRAY
*/

/// The statements read from a token sequence, and every problem found
/// while reading them.
#[derive(Debug, Default)]
pub struct ParserOutput {
    pub program: Program,
    pub errors: Vec<CompilerError<ParserError>>,
}

/// Parses a fully expanded token sequence into a program.  References are
/// recorded but not resolved.
pub fn parse(tokens: &[Token]) -> ParserOutput {
    Parser::new().parse(tokens)
}

struct Parser {
    program: Program,
    labels: LabelScopeStack,
    /// A label waiting for the statement it names
    pending_label: Option<Token>,
    errors: Vec<CompilerError<ParserError>>,
}

impl Parser {
    fn new() -> Parser {
        Parser {
            program: Program::new(),
            labels: LabelScopeStack::new(),
            pending_label: None,
            errors: vec![],
        }
    }

    fn parse(mut self, tokens: &[Token]) -> ParserOutput {
        let mut stream = TokenStream::new(tokens);
        while stream.peek().is_some() {
            let start = stream.index();
            if let Err(err) = self.statement(&mut stream) {
                debug!("Parser error at {}: {:?}", err.span(), err.inner());
                self.errors.push(err);
                // Always make progress after an error
                if stream.index() == start {
                    stream.next();
                }
            }
        }

        if let Some(label) = self.pending_label.take() {
            self.errors.push(CompilerError::new(
                label.span,
                ParserError::DanglingLabel(label_name(&label).into()),
            ))
        }

        debug!(
            "Parser produced {} statements with {} errors",
            self.program.len(),
            self.errors.len()
        );

        ParserOutput {
            program: self.program,
            errors: self.errors,
        }
    }

    fn statement(&mut self, stream: &mut TokenStream) -> ParserResult<()> {
        trace!(stream);
        let token = match stream.peek() {
            Some(token) => token,
            None => return Ok(()),
        };

        match token.kind {
            TokenKind::Label => {
                stream.next();
                if self.pending_label.is_some() {
                    return err!(
                        token.span,
                        ParserError::LabelledLabel(label_name(token).into())
                    );
                }
                self.pending_label = Some(token.clone());
                Ok(())
            }
            TokenKind::ScopePush => {
                stream.next();
                self.labels.push();
                Ok(())
            }
            TokenKind::ScopePop => {
                stream.next();
                if self.labels.pop() {
                    Ok(())
                } else {
                    err!(token.span, ParserError::UnpairedPop)
                }
            }
            TokenKind::Condition => {
                stream.next();
                self.push_statement(condition(token))
            }
            TokenKind::Action => {
                stream.next();
                match ControlAction::from_name(&token.text[1..]) {
                    Some(action) => {
                        self.push_statement(Statement::new(StatementKind::Action(action), token.span))
                    }
                    None => err!(token.span, ParserError::UnexpectedToken(token.kind)),
                }
            }
            TokenKind::RegisterAction => {
                let stmt = register_action(stream)?;
                self.push_statement(stmt)
            }
            TokenKind::Location => {
                let stmt = self.movement(stream)?;
                self.push_statement(stmt)
            }
            TokenKind::Str | TokenKind::ArrayStart => {
                let literal = self.literal(stream, 0)?;
                if self.pending_label.is_some() {
                    let span = literal.span();
                    self.push_statement(Statement::new(StatementKind::Constant(literal), span))
                } else {
                    err!(literal.span(), ParserError::UnlabelledData)
                }
            }
            kind => err!(token.span, ParserError::UnexpectedToken(kind)),
        }
    }

    /// Adds a statement to the program and binds the pending label to it.
    fn push_statement(&mut self, stmt: Statement) -> ParserResult<()> {
        let id = self.program.push(stmt);
        if let Some(label) = self.pending_label.take() {
            let key = self.labels.key(label_name(&label));
            debug!("Label {} at {}", key, label.span);
            if self.program.add_label(key.clone(), id).is_err() {
                return err!(label.span, ParserError::DuplicateLabel(key));
            }
        }
        Ok(())
    }

    fn movement(&mut self, stream: &mut TokenStream) -> ParserResult<Statement> {
        trace!(stream);
        let dest = stream.next_must_be(TokenKind::Location)?;
        let to_literal = self.optional_literal(stream)?;
        let to = destination(dest, to_literal.is_some())?;

        stream.next_must_be(TokenKind::Movement)?;

        let (from, from_literal, end) = match stream.next_if(TokenKind::Location) {
            Some(src) => {
                let from_literal = self.optional_literal(stream)?;
                let from = source(src, from_literal.is_some())?;
                let end = from_literal.as_ref().map_or(src.span, |l| l.span());
                (from, from_literal, end)
            }
            None => {
                let literal = self.literal(stream, 0)?;
                let end = literal.span();
                (SourceLocation::Immediate, Some(literal), end)
            }
        };

        Ok(Statement::new(
            StatementKind::Movement {
                to,
                to_literal,
                from,
                from_literal,
            },
            Span::cover(dest.span, end),
        ))
    }

    fn optional_literal(&mut self, stream: &mut TokenStream) -> ParserResult<Option<Literal>> {
        if stream.test_if_one_of(&LITERAL_START) {
            self.literal(stream, 0).map(Some)
        } else {
            Ok(None)
        }
    }

    fn literal(&mut self, stream: &mut TokenStream, depth: usize) -> ParserResult<Literal> {
        trace!(stream);
        let token = match stream.next_if_one_of(&LITERAL_START) {
            Some(token) => token,
            None => {
                let (span, found) = match stream.peek() {
                    Some(t) => (t.span, Some(t.kind)),
                    None => (stream.end_span(), None),
                };
                return err!(span, ParserError::ExpectedButFound(LITERAL_START.to_vec(), found));
            }
        };

        match token.kind {
            TokenKind::Number => match parse_number(&token.text) {
                Some(n) => Ok(Literal::Number(token.span, n)),
                None => err!(
                    token.span,
                    ParserError::ExpectedButFound(vec![TokenKind::Number], Some(token.kind))
                ),
            },
            TokenKind::Reference => {
                let rid =
                    self.program
                        .add_reference(&token.text[1..], self.labels.prefix(), token.span);
                Ok(Literal::Reference(token.span, rid))
            }
            TokenKind::Str => {
                let mut text = token.text.clone();
                let count = text.chars().count();
                let (length, span) = length_suffix(stream, token.span)?;
                if let Some(length) = length {
                    if length < count {
                        return err!(span, ParserError::LengthTooShort(length, count));
                    }
                    text.extend(std::iter::repeat('\0').take(length - count));
                }
                Ok(Literal::Text(span, text))
            }
            TokenKind::ArrayStart => {
                if depth >= MAX_LITERAL_DEPTH {
                    return err!(token.span, ParserError::LiteralTooDeep);
                }

                let mut elements = vec![];
                let close = loop {
                    if let Some(close) = stream.next_if(TokenKind::ArrayEnd) {
                        break close;
                    }
                    let element = self.literal(stream, depth + 1).map_err(|e| {
                        if let ParserError::ExpectedButFound(mut expected, found) = e.inner().clone()
                        {
                            expected.push(TokenKind::ArrayEnd);
                            CompilerError::new(e.span(), ParserError::ExpectedButFound(expected, found))
                        } else {
                            e
                        }
                    })?;
                    elements.push(element);
                };

                // Nested arrays and strings are laid out inline, so the
                // length counts words rather than elements
                let count: usize = elements.iter().map(|e| e.data_len()).sum();
                let (length, span) = length_suffix(stream, Span::cover(token.span, close.span))?;
                if let Some(length) = length {
                    if length < count {
                        return err!(span, ParserError::LengthTooShort(length, count));
                    }
                    elements.extend((count..length).map(|_| Literal::Number(span, 0)));
                }
                Ok(Literal::Array(span, elements))
            }
            _ => unreachable!("next_if_one_of only returns literal tokens"),
        }
    }
}

/// Reads an optional `~N` after a string or array.  Returns the length and
/// the span of the literal including the suffix.  A length which no machine
/// could address is rejected before anything is allocated for it.
fn length_suffix(stream: &mut TokenStream, span: Span) -> ParserResult<(Option<usize>, Span)> {
    if stream.next_if(TokenKind::ArrayLength).is_none() {
        return Ok((None, span));
    }

    let number = stream.next_must_be(TokenKind::Number)?;
    match parse_number(&number.text) {
        Some(n) if n as usize > MAX_LITERAL_LENGTH => err!(
            number.span,
            ParserError::LengthTooLong(n as usize, MAX_LITERAL_LENGTH)
        ),
        Some(n) => Ok((Some(n as usize), Span::cover(span, number.span))),
        None => err!(
            number.span,
            ParserError::ExpectedButFound(vec![TokenKind::Number], Some(number.kind))
        ),
    }
}

/// The name of a label token without its trailing `:`
fn label_name(token: &Token) -> &str {
    token.text.trim_end_matches(':')
}

fn condition(token: &Token) -> Statement {
    let text = &token.text[1..];
    let invert = text.starts_with('!');
    let text = text.trim_start_matches('!');
    let or = text.starts_with('|');
    let text = text.trim_start_matches('|');

    let mut targets = vec![];
    for target in text.chars().filter_map(ConditionTarget::from_char) {
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    Statement::new(
        StatementKind::Condition {
            invert,
            or,
            targets,
        },
        token.span,
    )
}

/// `+a` in one token, or an operator followed by the register a macro
/// parameter expanded to.
fn register_action(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let token = stream.next_must_be(TokenKind::RegisterAction)?;
    let mut chars = token.text.chars();
    let op = match chars.next().and_then(RegisterOp::from_symbol) {
        Some(op) => op,
        None => return err!(token.span, ParserError::UnexpectedToken(token.kind)),
    };

    let (target, span) = match chars.next() {
        Some(c) => match GeneralRegister::try_from(c) {
            Ok(target) => (target, token.span),
            Err(c) => {
                return err!(
                    token.span,
                    ParserError::InvalidRegisterActionTarget(Some(c.to_string()))
                )
            }
        },
        None => match stream.next_if(TokenKind::Location) {
            Some(reg) => {
                let mut reg_chars = reg.text.chars();
                match (reg_chars.next().map(GeneralRegister::try_from), reg_chars.next()) {
                    (Some(Ok(target)), None) => (target, Span::cover(token.span, reg.span)),
                    _ => {
                        return err!(
                            reg.span,
                            ParserError::InvalidRegisterActionTarget(Some(reg.text.clone()))
                        )
                    }
                }
            }
            None => {
                let found = stream.peek().map(|t| t.text.clone());
                return err!(token.span, ParserError::InvalidRegisterActionTarget(found));
            }
        },
    };

    Ok(Statement::new(
        StatementKind::RegisterAction { op, target },
        span,
    ))
}

fn check_location(token: &Token) -> ParserResult<()> {
    if VALID_LOCATIONS.contains(&token.text.as_str()) {
        Ok(())
    } else {
        err!(token.span, ParserError::UnknownLocation(token.text.clone()))
    }
}

fn destination(token: &Token, immediate: bool) -> ParserResult<DestinationLocation> {
    check_location(token)?;
    match DestinationLocation::from_name(&token.text, immediate) {
        Some(loc) => Ok(loc),
        None => err!(
            token.span,
            ParserError::InvalidDestinationLocation(token.text.clone(), immediate)
        ),
    }
}

fn source(token: &Token, immediate: bool) -> ParserResult<SourceLocation> {
    check_location(token)?;
    match SourceLocation::from_name(&token.text, immediate) {
        Some(loc) => Ok(loc),
        None => err!(
            token.span,
            ParserError::InvalidSourceLocation(token.text.clone(), immediate)
        ),
    }
}
