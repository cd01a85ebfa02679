//! Parser implementation using lalrpop

use crate::ast::{Block, Expression, Span};
use crate::error::{CompileError, Result};
use crate::lexer::Token;

#[cfg(test)]
mod tests;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

type GrammarError = lalrpop_util::ParseError<usize, Token, String>;

/// Parse tokens into a program block
pub fn parse(_filename: &str, _source: &str, tokens: Vec<(Token, Span)>) -> Result<Block> {
    grammar::ProgramParser::new()
        .parse(triples(tokens))
        .map_err(to_compile_error)
}

/// Parse tokens into a single expression (used by the REPL)
pub fn parse_expression(tokens: Vec<(Token, Span)>) -> Result<Expression> {
    grammar::ExpressionParser::new()
        .parse(triples(tokens))
        .map_err(to_compile_error)
}

fn triples(tokens: Vec<(Token, Span)>) -> impl Iterator<Item = (usize, Token, usize)> {
    tokens.into_iter().map(|(tok, span)| (span.start, tok, span.end))
}

fn to_compile_error(e: GrammarError) -> CompileError {
    let span = match &e {
        lalrpop_util::ParseError::InvalidToken { location } => Span::new(*location, *location + 1),
        lalrpop_util::ParseError::UnrecognizedEof { location, .. } => Span::new(*location, *location + 1),
        lalrpop_util::ParseError::UnrecognizedToken { token, .. } => Span::new(token.0, token.2),
        lalrpop_util::ParseError::ExtraToken { token } => Span::new(token.0, token.2),
        lalrpop_util::ParseError::User { .. } => Span::new(0, 1),
    };
    CompileError::parser(format!("{e}"), span)
}
