//! Tokenizer for unit expressions.

use uc_core::{UcError, UcResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Label(String),
    Star,
    Slash,
    Percent,
    /// A `.` not followed by a digit; multiplies like `*`.
    Dot,
    Caret,
    Plus,
    Minus,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the source expression.
    pub pos: usize,
}

fn is_label_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_label_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_error(expr: &str, pos: usize, what: impl Into<String>) -> UcError {
    UcError::Parse {
        expr: expr.to_string(),
        pos,
        what: what.into(),
    }
}

pub fn tokenize(expr: &str) -> UcResult<Vec<Token>> {
    let bytes = expr.as_bytes();
    let digit_at = |i: usize| bytes.get(i).is_some_and(|b| b.is_ascii_digit());

    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && digit_at(pos + 1)) {
            let mut end = pos;
            while digit_at(end) {
                end += 1;
            }
            if bytes.get(end) == Some(&b'.') && digit_at(end + 1) {
                end += 1;
                while digit_at(end) {
                    end += 1;
                }
            }
            if matches!(bytes.get(end), Some(b'e' | b'E')) {
                let signed = matches!(bytes.get(end + 1), Some(b'+' | b'-'));
                let first = if signed { end + 2 } else { end + 1 };
                if digit_at(first) {
                    end = first;
                    while digit_at(end) {
                        end += 1;
                    }
                }
            }
            let text = &expr[pos..end];
            let value: f64 = text
                .parse()
                .map_err(|_| parse_error(expr, pos, format!("malformed number '{text}'")))?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos,
            });
            while chars.peek().is_some_and(|&(i, _)| i < end) {
                chars.next();
            }
            continue;
        }

        if is_label_start(c) {
            let mut end = pos;
            while let Some(&(i, ch)) = chars.peek() {
                if i != pos && !is_label_continue(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Label(expr[pos..end].to_string()),
                pos,
            });
            continue;
        }

        let kind = match c {
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '.' => TokenKind::Dot,
            '^' => TokenKind::Caret,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => return Err(parse_error(expr, pos, format!("unexpected character '{other}'"))),
        };
        tokens.push(Token { kind, pos });
        chars.next();
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(expr: &str) -> Vec<TokenKind> {
        tokenize(expr).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn label(s: &str) -> TokenKind {
        TokenKind::Label(s.to_string())
    }

    #[test]
    fn simple_quotient() {
        assert_eq!(
            kinds("m/s^2"),
            vec![
                label("m"),
                TokenKind::Slash,
                label("s"),
                TokenKind::Caret,
                TokenKind::Number(2.0)
            ]
        );
    }

    #[test]
    fn dot_multiplies_unless_decimal() {
        assert_eq!(kinds("J.s"), vec![label("J"), TokenKind::Dot, label("s")]);
        assert_eq!(kinds("2.5"), vec![TokenKind::Number(2.5)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5)]);
        assert_eq!(
            kinds("2.m"),
            vec![TokenKind::Number(2.0), TokenKind::Dot, label("m")]
        );
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(kinds("1e3"), vec![TokenKind::Number(1000.0)]);
        assert_eq!(kinds("2.5E-2"), vec![TokenKind::Number(0.025)]);
        // "e" without digits starts a label.
        assert_eq!(kinds("2eV"), vec![TokenKind::Number(2.0), label("eV")]);
    }

    #[test]
    fn unicode_labels() {
        assert_eq!(kinds("Å"), vec![label("Å")]);
        assert_eq!(kinds("kΩ"), vec![label("kΩ")]);
        assert_eq!(kinds("μm µm"), vec![label("μm"), label("µm")]);
    }

    #[test]
    fn labels_may_carry_trailing_digits() {
        assert_eq!(kinds("mu0 * eps0"), vec![label("mu0"), TokenKind::Star, label("eps0")]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("Å / s").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 3, 5]);
    }

    #[test]
    fn rejects_stray_characters() {
        let err = tokenize("m # s").unwrap_err();
        assert!(matches!(err, UcError::Parse { pos: 2, .. }));
    }
}
