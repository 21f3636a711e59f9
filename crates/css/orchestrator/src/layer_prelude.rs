//! Parsing the prelude of `@layer` rules.
//! Spec: <https://www.w3.org/TR/css-cascade-5/#layer-names>
//!
//! `@layer;` is invalid, `@layer { }` is anonymous, `@layer a.b { }` names a
//! single (possibly nested) layer and `@layer a, b.c;` declares a list.

use core::error::Error;
use core::fmt::{self, Display, Formatter};
use css_cascade::{CascadeError, LayerName};
use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

/// CSS-wide keywords, which may not be used as layer names.
const RESERVED_NAMES: [&str; 6] = [
    "initial",
    "inherit",
    "unset",
    "default",
    "revert",
    "revert-layer",
];

/// Parsed `@layer` prelude.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerPrelude {
    /// No name at all.
    Anonymous,
    /// One or more comma-separated dotted names.
    Names(Vec<LayerName>),
}

/// Why an `@layer` prelude was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerPreludeError {
    /// Unexpected token at the given 1-based line and column.
    Syntax { line: u32, column: u32 },
    /// A name segment failed layer-name validation.
    InvalidName(CascadeError),
    /// A CSS-wide keyword was used as a segment.
    ReservedName(String),
    /// A block form listed more than one name.
    BlockWithMultipleNames(usize),
    /// A statement form listed no names.
    EmptyStatement,
}

impl Display for LayerPreludeError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { line, column } => {
                write!(formatter, "unexpected token in @layer prelude at {line}:{column}")
            }
            Self::InvalidName(err) => write!(formatter, "{err}"),
            Self::ReservedName(name) => {
                write!(formatter, "`{name}` is reserved and cannot name a layer")
            }
            Self::BlockWithMultipleNames(count) => {
                write!(formatter, "@layer block names {count} layers, expected one")
            }
            Self::EmptyStatement => write!(formatter, "@layer statement names no layers"),
        }
    }
}

impl Error for LayerPreludeError {}

/// Custom failures raised while walking the token stream.
#[derive(Debug)]
enum NameFailure {
    Invalid(CascadeError),
    Reserved(String),
}

/// Parse an `@layer` prelude without deciding between block and statement form.
///
/// # Errors
/// Returns `LayerPreludeError` for anything that is not an empty prelude or a
/// comma-separated list of dotted identifiers.
pub fn parse_layer_prelude(prelude: &str) -> Result<LayerPrelude, LayerPreludeError> {
    let mut input = ParserInput::new(prelude);
    let mut parser = Parser::new(&mut input);
    if parser.is_exhausted() {
        return Ok(LayerPrelude::Anonymous);
    }
    parser
        .parse_comma_separated(parse_layer_name)
        .map(LayerPrelude::Names)
        .map_err(into_prelude_error)
}

/// Parse the prelude of `@layer <name>? { ... }`.
///
/// # Errors
/// Fails like [`parse_layer_prelude`], and when more than one name is given.
pub fn parse_layer_block_prelude(prelude: &str) -> Result<Option<LayerName>, LayerPreludeError> {
    match parse_layer_prelude(prelude)? {
        LayerPrelude::Anonymous => Ok(None),
        LayerPrelude::Names(mut names) if names.len() == 1 => Ok(names.pop()),
        LayerPrelude::Names(names) => Err(LayerPreludeError::BlockWithMultipleNames(names.len())),
    }
}

/// Parse the prelude of `@layer <name>#;`.
///
/// # Errors
/// Fails like [`parse_layer_prelude`], and when no name is given.
pub fn parse_layer_statement_prelude(prelude: &str) -> Result<Vec<LayerName>, LayerPreludeError> {
    match parse_layer_prelude(prelude)? {
        LayerPrelude::Anonymous => Err(LayerPreludeError::EmptyStatement),
        LayerPrelude::Names(names) => Ok(names),
    }
}

/// `<ident> ('.' <ident>)*` with no whitespace around the dots.
fn parse_layer_name<'input>(
    input: &mut Parser<'input, '_>,
) -> Result<LayerName, ParseError<'input, NameFailure>> {
    let first: &str = input.expect_ident()?;
    let mut idents = vec![first.to_owned()];
    loop {
        let before_dot = input.state();
        if !matches!(input.next_including_whitespace(), Ok(&Token::Delim('.'))) {
            input.reset(&before_dot);
            break;
        }
        let location = input.current_source_location();
        match input.next_including_whitespace()? {
            Token::Ident(ident) => {
                let segment: &str = ident;
                idents.push(segment.to_owned());
            }
            other => return Err(location.new_unexpected_token_error(other.clone())),
        }
    }
    if let Some(reserved) = idents.iter().find(|ident| {
        RESERVED_NAMES
            .iter()
            .any(|keyword| ident.eq_ignore_ascii_case(keyword))
    }) {
        return Err(input.new_custom_error(NameFailure::Reserved(reserved.clone())));
    }
    LayerName::from_idents(idents).map_err(|err| input.new_custom_error(NameFailure::Invalid(err)))
}

fn into_prelude_error(err: ParseError<'_, NameFailure>) -> LayerPreludeError {
    match err.kind {
        ParseErrorKind::Custom(NameFailure::Invalid(inner)) => {
            LayerPreludeError::InvalidName(inner)
        }
        ParseErrorKind::Custom(NameFailure::Reserved(name)) => {
            LayerPreludeError::ReservedName(name)
        }
        ParseErrorKind::Basic(_) => LayerPreludeError::Syntax {
            line: err.location.line + 1,
            column: err.location.column,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prelude: &str) -> Vec<String> {
        match parse_layer_prelude(prelude) {
            Ok(LayerPrelude::Names(list)) => list.iter().map(ToString::to_string).collect(),
            other => panic!("unexpected parse of `{prelude}`: {other:?}"),
        }
    }

    #[test]
    fn empty_prelude_is_anonymous() {
        assert_eq!(parse_layer_prelude(""), Ok(LayerPrelude::Anonymous));
        assert_eq!(parse_layer_prelude("  /* note */ "), Ok(LayerPrelude::Anonymous));
        assert_eq!(parse_layer_block_prelude(" "), Ok(None));
    }

    #[test]
    fn lists_and_dotted_names() {
        assert_eq!(names("reset, theme"), ["reset", "theme"]);
        assert_eq!(names(" framework.base ,utilities"), ["framework.base", "utilities"]);
        assert_eq!(names("a.b.c"), ["a.b.c"]);
    }

    #[test]
    fn whitespace_inside_a_name_is_rejected() {
        assert!(matches!(
            parse_layer_prelude("framework .base"),
            Err(LayerPreludeError::Syntax { .. })
        ));
        assert!(matches!(
            parse_layer_prelude("framework. base"),
            Err(LayerPreludeError::Syntax { .. })
        ));
        assert!(matches!(
            parse_layer_prelude("reset,"),
            Err(LayerPreludeError::Syntax { .. })
        ));
        assert!(matches!(
            parse_layer_prelude("\"quoted\""),
            Err(LayerPreludeError::Syntax { .. })
        ));
    }

    #[test]
    fn css_wide_keywords_are_reserved() {
        assert_eq!(
            parse_layer_prelude("theme.Revert-Layer"),
            Err(LayerPreludeError::ReservedName("Revert-Layer".to_owned()))
        );
    }

    #[test]
    fn block_and_statement_forms() {
        assert_eq!(
            parse_layer_block_prelude("a, b"),
            Err(LayerPreludeError::BlockWithMultipleNames(2))
        );
        assert_eq!(
            parse_layer_statement_prelude(""),
            Err(LayerPreludeError::EmptyStatement)
        );
        let statement = parse_layer_statement_prelude("x, y.z").unwrap_or_default();
        assert_eq!(statement.len(), 2);
    }
}
