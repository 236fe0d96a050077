//! Minimal Cypher lexer.
//!
//! Produces words and punctuation with their byte spans and bracket depth.
//! String literals, backtick-quoted names and `//` comments are skipped
//! entirely; numbers are dropped. This is enough for clause-boundary and
//! scope heuristics and nothing more.

/// A lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'q> {
    /// Identifier or keyword
    Word(&'q str),
    /// Any other non-whitespace byte
    Punct(u8),
}

/// Token plus its position in the source text
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexeme<'q> {
    pub token: Token<'q>,
    pub start: usize,
    pub end: usize,
    /// Number of open brackets around this token
    pub depth: usize,
    /// Innermost open bracket, if any
    pub enclosing: Option<u8>,
}

impl<'q> Lexeme<'q> {
    pub fn word(&self) -> Option<&'q str> {
        match self.token {
            Token::Word(w) => Some(w),
            Token::Punct(_) => None,
        }
    }

    /// Case-insensitive keyword comparison
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.word().is_some_and(|w| w.eq_ignore_ascii_case(keyword))
    }

    pub fn is_punct(&self, byte: u8) -> bool {
        self.token == Token::Punct(byte)
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Index just past the closing quote matching the one at `open`
fn skip_quoted(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote != b'`' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

pub(crate) fn tokenize(text: &str) -> Vec<Lexeme<'_>> {
    let bytes = text.as_bytes();
    let mut lexemes = Vec::new();
    let mut open: Vec<u8> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\'' | b'"' | b'`' => i = skip_quoted(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ if b.is_ascii_whitespace() => i += 1,
            _ if is_ident_byte(b) => {
                let start = i;
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                if !b.is_ascii_digit() {
                    lexemes.push(Lexeme {
                        token: Token::Word(&text[start..i]),
                        start,
                        end: i,
                        depth: open.len(),
                        enclosing: open.last().copied(),
                    });
                }
            }
            b'(' | b'[' | b'{' => {
                lexemes.push(Lexeme {
                    token: Token::Punct(b),
                    start: i,
                    end: i + 1,
                    depth: open.len(),
                    enclosing: open.last().copied(),
                });
                open.push(b);
                i += 1;
            }
            b')' | b']' | b'}' => {
                open.pop();
                lexemes.push(Lexeme {
                    token: Token::Punct(b),
                    start: i,
                    end: i + 1,
                    depth: open.len(),
                    enclosing: open.last().copied(),
                });
                i += 1;
            }
            _ => {
                lexemes.push(Lexeme {
                    token: Token::Punct(b),
                    start: i,
                    end: i + 1,
                    depth: open.len(),
                    enclosing: open.last().copied(),
                });
                i += 1;
            }
        }
    }

    lexemes
}
