//! Minimal reader for `.properties`-style text, as found in predefined trigger parameters.
//!
//! Each logical line yields its own result so that one malformed entry does not hide the rest.
use crate::{
    domain::KeyValue,
    error::{ModelError, ModelResult},
};

/// Parse a properties block into entries, one result per logical line.
///
/// Rules:
/// - blank lines and lines starting with `#` or `!` are skipped;
/// - a line ending with an odd number of `\` continues on the next line;
/// - the key ends at the first unescaped `=`, `:` or whitespace;
/// - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded, any other escaped char is kept as is.
pub fn parse_properties(text: &str) -> Vec<ModelResult<KeyValue>> {
    logical_lines(text)
        .into_iter()
        .filter(|line| {
            let trimmed = line.trim_start();
            !(trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!'))
        })
        .map(|line| parse_entry(&line))
        .collect()
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut continued = false;

    for raw in text.lines() {
        let line = if continued { raw.trim_start() } else { raw };
        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();

        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            continued = true;
        } else {
            current.push_str(line);
            out.push(std::mem::take(&mut current));
            continued = false;
        }
    }
    if continued {
        out.push(current);
    }
    out
}

fn parse_entry(line: &str) -> ModelResult<KeyValue> {
    let line = line.trim_start();
    let mut key_end = line.len();
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&line[..key_end], line)?;
    if key.is_empty() {
        return Err(ModelError::MalformedProperty(line.to_string()));
    }

    let mut rest = line[key_end..].trim_start();
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start();
    }
    let value = unescape(rest.trim_end(), line)?;

    Ok(KeyValue::new(key, value))
}

fn unescape(raw: &str, line: &str) -> ModelResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| ModelError::MalformedProperty(line.to_string()))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_entries(text: &str) -> Vec<(String, String)> {
        parse_properties(text)
            .into_iter()
            .map(|r| {
                let kv = r.expect("entry must parse");
                (kv.key().to_string(), kv.value().to_string())
            })
            .collect()
    }

    #[test]
    fn parses_common_separators() {
        let text = "NODE=jdk7\nOTHER : linux && x64\nSPACED value here\n";
        assert_eq!(
            ok_entries(text),
            vec![
                ("NODE".into(), "jdk7".into()),
                ("OTHER".into(), "linux && x64".into()),
                ("SPACED".into(), "value here".into()),
            ]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# comment\n! other comment\n\n   \nA=1";
        assert_eq!(ok_entries(text), vec![("A".into(), "1".into())]);
    }

    #[test]
    fn joins_continuation_lines() {
        let text = "LABEL=windows && \\\n    jdk7\nB=2";
        assert_eq!(
            ok_entries(text),
            vec![
                ("LABEL".into(), "windows && jdk7".into()),
                ("B".into(), "2".into()),
            ]
        );
    }

    #[test]
    fn decodes_escapes() {
        assert_eq!(
            ok_entries(r"A\=B=x\u0041y"),
            vec![("A=B".into(), "xAy".into())]
        );
    }

    #[test]
    fn key_without_value_is_empty_value() {
        assert_eq!(ok_entries("FLAG"), vec![("FLAG".into(), "".into())]);
    }

    #[test]
    fn malformed_entries_do_not_hide_others() {
        let results = parse_properties("=orphan\nGOOD=1\nBAD=\\u12");
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(ModelError::MalformedProperty(_))));
        assert_eq!(results[1].as_ref().unwrap().value(), "1");
        assert!(matches!(results[2], Err(ModelError::MalformedProperty(_))));
    }
}
