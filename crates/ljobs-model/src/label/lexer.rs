use std::{fmt, iter::Peekable, str::CharIndices};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Atom(String),
    And,
    Or,
    Not,
    Implies,
    Iff,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(name) => write!(f, "atom {name:?}"),
            Token::And => f.write_str("'&&'"),
            Token::Or => f.write_str("'||'"),
            Token::Not => f.write_str("'!'"),
            Token::Implies => f.write_str("'->'"),
            Token::Iff => f.write_str("'<->'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

/// Token with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Returns `true` if `c` may appear in an unquoted atom.
///
/// `-` is an atom character too, except when it opens `->`; the lexer handles that case.
pub(crate) fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '&' | '|' | '!' | '(' | ')' | '"' | '<')
}

pub(crate) fn tokenize(input: &str) -> ModelResult<Vec<Spanned>> {
    let mut chars = input.char_indices().peekable();
    let mut out = Vec::new();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '&' => pair(input, &mut chars, '&', Token::And)?,
            '|' => pair(input, &mut chars, '|', Token::Or)?,
            '!' => {
                chars.next();
                Token::Not
            }
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '<' => {
                chars.next();
                if !(eat(&mut chars, '-') && eat(&mut chars, '>')) {
                    return Err(ModelError::syntax(input, offset, "expected '<->'"));
                }
                Token::Iff
            }
            '-' if input[offset + 1..].starts_with('>') => {
                chars.next();
                chars.next();
                Token::Implies
            }
            '"' => Token::Atom(quoted(input, &mut chars)?),
            _ => Token::Atom(bare(input, &mut chars)),
        };
        out.push(Spanned { token, offset });
    }

    Ok(out)
}

fn eat(chars: &mut Peekable<CharIndices<'_>>, want: char) -> bool {
    match chars.peek() {
        Some(&(_, c)) if c == want => {
            chars.next();
            true
        }
        _ => false,
    }
}

fn pair(
    input: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    want: char,
    token: Token,
) -> ModelResult<Token> {
    let (offset, _) = chars.next().unwrap_or((input.len(), want));
    if eat(chars, want) {
        Ok(token)
    } else {
        Err(ModelError::syntax(
            input,
            offset,
            format!("expected '{want}{want}'"),
        ))
    }
}

fn bare(input: &str, chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut atom = String::new();
    while let Some(&(offset, c)) = chars.peek() {
        if !is_atom_char(c) || (c == '-' && input[offset + 1..].starts_with('>')) {
            break;
        }
        atom.push(c);
        chars.next();
    }
    atom
}

fn quoted(input: &str, chars: &mut Peekable<CharIndices<'_>>) -> ModelResult<String> {
    let (start, _) = chars.next().unwrap_or((0, '"'));
    let mut atom = String::new();

    loop {
        match chars.next() {
            Some((_, '"')) => return Ok(atom),
            Some((_, '\\')) => match chars.next() {
                Some((_, c)) => atom.push(c),
                None => break,
            },
            Some((_, c)) => atom.push(c),
            None => break,
        }
    }

    Err(ModelError::syntax(input, start, "unterminated quoted atom"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("input must tokenize")
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn splits_operators_and_atoms() {
        assert_eq!(
            tokens("windows && !(jdk7||jdk8)"),
            vec![
                Token::Atom("windows".into()),
                Token::And,
                Token::Not,
                Token::LParen,
                Token::Atom("jdk7".into()),
                Token::Or,
                Token::Atom("jdk8".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn hyphen_is_part_of_atom_unless_implies() {
        assert_eq!(
            tokens("linux-x64->docker"),
            vec![
                Token::Atom("linux-x64".into()),
                Token::Implies,
                Token::Atom("docker".into()),
            ]
        );
    }

    #[test]
    fn iff_and_quoted_atoms() {
        assert_eq!(
            tokens(r#""my label"<->"with \"quote\"""#),
            vec![
                Token::Atom("my label".into()),
                Token::Iff,
                Token::Atom("with \"quote\"".into()),
            ]
        );
    }

    #[test]
    fn single_ampersand_reports_offset() {
        match tokenize("a & b") {
            Err(ModelError::Syntax { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        assert!(tokenize("\"open").is_err());
        assert!(tokenize("a <- b").is_err());
    }

    #[test]
    fn dollar_is_a_plain_atom_character() {
        assert_eq!(tokens("label$"), vec![Token::Atom("label$".into())]);
    }
}
