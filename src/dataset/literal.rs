//! Strict parser for the serialized list literals stored in the CSV cells,
//! e.g. `['Action', 'Drama']` or `["Schindler's List"]`.
//!
//! Only a flat bracketed list of quoted strings is accepted. There is no
//! expression evaluation of any kind: numbers, nested lists, bare words and
//! trailing input are all rejected.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, map_opt, opt, value},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, preceded, terminated},
};
use thiserror::Error;

const SNIPPET_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed list literal at byte {offset}: {snippet:?}")]
pub struct ListLiteralError {
    pub offset: usize,
    pub snippet: String,
}

impl ListLiteralError {
    fn at(input: &str, rest: &str) -> Self {
        Self {
            offset: input.len().saturating_sub(rest.len()),
            snippet: rest.chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Parses a serialized list of strings.
///
/// # Errors
///
/// Returns [`ListLiteralError`] pointing at the first byte that does not fit
/// the grammar.
pub fn parse_list_literal(input: &str) -> Result<Vec<String>, ListLiteralError> {
    match all_consuming(terminated(list, multispace0)).parse(input) {
        Ok((_, items)) => Ok(items),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(ListLiteralError::at(input, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(ListLiteralError::at(input, "")),
    }
}

fn list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        preceded(multispace0, char('[')),
        preceded(multispace0, items),
        preceded(multispace0, char(']')),
    )
    .parse(input)
}

fn items(input: &str) -> IResult<&str, Vec<String>> {
    let (input, items) = separated_list0(separator, string_literal).parse(input)?;
    if items.is_empty() {
        return Ok((input, items));
    }

    // trailing comma is legal after at least one item
    let (input, _) = opt(separator).parse(input)?;
    Ok((input, items))
}

fn separator(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0).parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    alt((quoted('\'', "\\'\n"), quoted('"', "\\\"\n"))).parse(input)
}

enum Fragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn quoted<'a>(
    quote: char,
    stop: &'static str,
) -> impl Parser<&'a str, Output = String, Error = nom::error::Error<&'a str>> {
    delimited(
        char(quote),
        fold_many0(
            alt((
                map(is_not(stop), Fragment::Literal),
                map(escaped_char, Fragment::Escaped),
            )),
            String::new,
            |mut acc, fragment| {
                match fragment {
                    Fragment::Literal(s) => acc.push_str(s),
                    Fragment::Escaped(c) => acc.push(c),
                }
                acc
            },
        ),
        char(quote),
    )
}

fn escaped_char(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\\', char('\\')),
            value('\'', char('\'')),
            value('"', char('"')),
            value('\n', char('n')),
            value('\t', char('t')),
            value('\r', char('r')),
            value('\0', char('0')),
            preceded(char('x'), hex_char(2)),
            preceded(char('u'), hex_char(4)),
        )),
    )
    .parse(input)
}

fn hex_char<'a>(
    digits: usize,
) -> impl Parser<&'a str, Output = char, Error = nom::error::Error<&'a str>> {
    map_opt(
        take_while_m_n(digits, digits, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quoted_items() {
        assert_eq!(
            parse_list_literal("['Action', 'Drama']").unwrap(),
            vec!["Action", "Drama"]
        );
    }

    #[test]
    fn test_double_quotes_keep_apostrophe() {
        assert_eq!(
            parse_list_literal(r#"["Schindler's List", 'Jaws']"#).unwrap(),
            vec!["Schindler's List", "Jaws"]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            parse_list_literal(r"['It\'s', 'a\\b', 'caf\xe9', '\u00e9t\u00e9']").unwrap(),
            vec!["It's", "a\\b", "café", "été"]
        );
    }

    #[test]
    fn test_empty_and_blank_entries() {
        assert!(parse_list_literal("[]").unwrap().is_empty());
        assert!(parse_list_literal("  [ ]  ").unwrap().is_empty());
        assert_eq!(parse_list_literal("['']").unwrap(), vec![""]);
    }

    #[test]
    fn test_whitespace_and_trailing_comma() {
        assert_eq!(
            parse_list_literal("[ 'A. Director' ,\n 'B. Star', ]").unwrap(),
            vec!["A. Director", "B. Star"]
        );
    }

    #[test]
    fn test_entries_are_not_trimmed_here() {
        assert_eq!(parse_list_literal("[' Drama ']").unwrap(), vec![" Drama "]);
    }

    #[test]
    fn test_rejects_non_lists() {
        for input in [
            "",
            "Action, Drama",
            "'Action'",
            "['Action', 1]",
            "[['Action']]",
            "['Action'] + ['Drama']",
            "['unterminated]",
            "[,]",
            "['a',,'b']",
            "__import__('os').system('true')",
        ] {
            assert!(parse_list_literal(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_error_points_at_offending_byte() {
        let err = parse_list_literal("['Action', 42]").unwrap_err();
        assert_eq!(err.offset, 11);
        assert!(err.snippet.starts_with("42"));
    }
}
