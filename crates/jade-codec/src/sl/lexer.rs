//! Tokens of the SL surface syntax.

use std::iter::Peekable;
use std::str::CharIndices;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use jade_content::{CodecError, CodecResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Open,
    Close,
    /// Unquoted word: a type name, operator, number, date or string.
    Word(String),
    Quoted(String),
    Variable { name: String, meta: bool },
    /// `:name`, introducing a named slot.
    Keyword(String),
    /// `#<len>"<base64>`.
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Byte offset of the first character.
    pub(crate) offset: usize,
}

pub(crate) fn parse_error(offset: usize, message: impl Into<String>) -> CodecError {
    CodecError::Parse {
        offset,
        message: message.into(),
    }
}

/// Characters that end an unquoted word.
pub(crate) fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"')
}

pub(crate) fn tokenize(input: &str) -> CodecResult<Vec<Token>> {
    let mut lexer = Lexer {
        chars: input.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn next_token(&mut self) -> CodecResult<Option<Token>> {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(offset, c)) = self.chars.peek() else {
            return Ok(None);
        };
        let kind = match c {
            '(' => {
                self.chars.next();
                TokenKind::Open
            }
            ')' => {
                self.chars.next();
                TokenKind::Close
            }
            '"' => TokenKind::Quoted(self.quoted(offset)?),
            '#' => TokenKind::Bytes(self.bytes(offset)?),
            '?' => {
                self.chars.next();
                let meta = self.chars.next_if(|&(_, c)| c == '?').is_some();
                let name = self.word();
                if name.is_empty() {
                    return Err(parse_error(offset, "variable without a name"));
                }
                TokenKind::Variable { name, meta }
            }
            ':' => {
                self.chars.next();
                let name = self.word();
                if name.is_empty() {
                    return Err(parse_error(offset, "slot keyword without a name"));
                }
                TokenKind::Keyword(name)
            }
            _ => TokenKind::Word(self.word()),
        };
        Ok(Some(Token { kind, offset }))
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| !is_delimiter(c)) {
            word.push(c);
        }
        word
    }

    fn quoted(&mut self, offset: usize) -> CodecResult<String> {
        self.chars.next();
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(text),
                '\\' => match self.chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                _ => text.push(c),
            }
        }
        Err(parse_error(offset, "unterminated string"))
    }

    fn bytes(&mut self, offset: usize) -> CodecResult<Vec<u8>> {
        self.chars.next();
        let mut digits = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            digits.push(c);
        }
        let len: usize = digits
            .parse()
            .map_err(|e| parse_error(offset, format!("invalid byte-sequence length: {e}")))?;
        if self.chars.next_if(|&(_, c)| c == '"').is_none() {
            return Err(parse_error(offset, "expected '\"' after byte-sequence length"));
        }
        let mut encoded = String::with_capacity(len);
        for _ in 0..len {
            let Some((_, c)) = self.chars.next() else {
                return Err(parse_error(offset, "truncated byte sequence"));
            };
            encoded.push(c);
        }
        STANDARD
            .decode(encoded)
            .map_err(|e| parse_error(offset, format!("invalid base64 payload: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn words_keywords_and_variables() {
        assert_eq!(
            kinds("(Person :name ?x ??meta)"),
            vec![
                TokenKind::Open,
                TokenKind::Word("Person".into()),
                TokenKind::Keyword("name".into()),
                TokenKind::Variable {
                    name: "x".into(),
                    meta: false
                },
                TokenKind::Variable {
                    name: "meta".into(),
                    meta: true
                },
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn quoted_strings_unescape() {
        assert_eq!(
            kinds(r#""say \"hi\" \\ bye""#),
            vec![TokenKind::Quoted(r#"say "hi" \ bye"#.into())]
        );
    }

    #[test]
    fn byte_sequences_decode() {
        assert_eq!(kinds("#4\"AQID"), vec![TokenKind::Bytes(vec![1, 2, 3])]);
    }

    #[test]
    fn offsets_point_at_the_token() {
        let tokens = tokenize("  (a  b)").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![2, 3, 6, 7]);
    }

    #[test]
    fn errors_carry_offsets() {
        let err = tokenize("(a \"open").unwrap_err();
        assert!(matches!(err, CodecError::Parse { offset: 3, .. }));
        let err = tokenize("(a #9\"AQID\")").unwrap_err();
        assert!(matches!(err, CodecError::Parse { offset: 3, .. }));
        let err = tokenize("(a ? b)").unwrap_err();
        assert!(matches!(err, CodecError::Parse { offset: 3, .. }));
    }
}
