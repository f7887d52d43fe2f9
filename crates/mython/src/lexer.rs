//! Indentation-aware lexer (spec.md §4.1).
//!
//! Tokenizes eagerly into a materialized `Vec<Token>` terminated by exactly
//! one [`Token::Eof`], then exposes a cursor (`current`/`advance`) over it.
//! The tricky part is the newline/indentation protocol: a `Newline` token is
//! suppressed after another `Newline` or a `Dedent`, and indentation is only
//! measured immediately after a `Newline` has been emitted.

use crate::{
    error::{MythonError, MythonResult},
    token::Token,
};

/// Cursor over an eagerly tokenized source.
pub struct Lexer {
    tokens: Vec<Token>,
    pos: usize,
}

impl Lexer {
    /// Tokenizes `source` in full, then positions the cursor at the first token.
    pub fn new(source: &str) -> MythonResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self { tokens, pos: 0 })
    }

    /// The token the cursor currently points at.
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Moves the cursor forward one token and returns the new current token.
    ///
    /// Idempotent once the cursor reaches the final (`Eof`) token.
    pub fn advance(&mut self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.current()
    }

    /// The full materialized token sequence, for tests and tooling.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn last_suppresses_newline(tokens: &[Token]) -> bool {
    matches!(tokens.last(), Some(Token::Newline) | Some(Token::Dedent))
}

/// Tokenizes `source` into a flat token sequence ending in exactly one `Eof`.
fn tokenize(source: &str) -> MythonResult<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut idx = 0usize;
    let mut tokens: Vec<Token> = Vec::new();
    let mut indent_level: usize = 0;

    while idx < len {
        if matches!(tokens.last(), Some(Token::Newline)) {
            idx = measure_indentation(&chars, idx, &mut indent_level, &mut tokens)?;
            if idx >= len {
                break;
            }
        }

        let c = chars[idx];

        if c == '\n' {
            if !last_suppresses_newline(&tokens) {
                tokens.push(Token::Newline);
            }
            idx += 1;
            continue;
        }

        if c == ' ' || c == '\r' {
            idx += 1;
            continue;
        }

        if c == '\t' {
            return Err(MythonError::lexical(
                "tab characters are not supported outside string literals; use spaces",
            ));
        }

        if c == '#' {
            while idx < len && chars[idx] != '\n' {
                idx += 1;
            }
            if !last_suppresses_newline(&tokens) {
                tokens.push(Token::Newline);
            }
            continue;
        }

        if is_ident_start(c) {
            let start = idx;
            idx += 1;
            while idx < len && is_ident_continue(chars[idx]) {
                idx += 1;
            }
            let ident: String = chars[start..idx].iter().collect();
            tokens.push(Token::keyword(&ident).unwrap_or(Token::Id(ident)));
            continue;
        }

        if c.is_ascii_digit() {
            let start = idx;
            idx += 1;
            while idx < len && chars[idx].is_ascii_digit() {
                idx += 1;
            }
            let text: String = chars[start..idx].iter().collect();
            let value: i64 = text
                .parse()
                .map_err(|_| MythonError::lexical(format!("invalid number literal '{text}'")))?;
            tokens.push(Token::Number(value));
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, next_idx) = scan_string(&chars, idx, c)?;
            tokens.push(Token::String(text));
            idx = next_idx;
            continue;
        }

        if let Some((token, width)) = match_operator(&chars, idx) {
            tokens.push(token);
            idx += width;
            continue;
        }

        tokens.push(Token::Char(c));
        idx += 1;
    }

    if !matches!(tokens.last(), Some(Token::Newline) | Some(Token::Dedent)) {
        tokens.push(Token::Newline);
    }
    tokens.push(Token::Eof);

    Ok(tokens)
}

/// Measures leading-space indentation at the start of a logical line and
/// emits the `Indent`/`Dedent` tokens needed to reach the new level.
///
/// Returns the index just past the counted spaces. Per spec.md §4.1, if the
/// line turns out to be blank or EOF follows, no `Indent`/`Dedent` is emitted
/// (but the counted whitespace is still consumed, which is harmless since it
/// produces no tokens either way).
fn measure_indentation(
    chars: &[char],
    mut idx: usize,
    indent_level: &mut usize,
    tokens: &mut Vec<Token>,
) -> MythonResult<usize> {
    let len = chars.len();
    let mut spaces = 0usize;
    while idx < len && chars[idx] == ' ' {
        spaces += 1;
        idx += 1;
    }
    if idx < len && chars[idx] == '\t' {
        return Err(MythonError::lexical(
            "tab characters are not supported in indentation; use spaces",
        ));
    }

    let blank_or_eof = idx >= len || chars[idx] == '\n';
    if !blank_or_eof {
        let target = spaces / 2;
        if target > *indent_level {
            for _ in 0..(target - *indent_level) {
                tokens.push(Token::Indent);
            }
        } else if target < *indent_level {
            for _ in 0..(*indent_level - target) {
                tokens.push(Token::Dedent);
            }
        }
        *indent_level = target;
    }
    Ok(idx)
}

/// Scans a string literal starting at the opening quote `chars[idx]`.
///
/// Returns the decoded text and the index just past the closing quote.
fn scan_string(chars: &[char], idx: usize, quote: char) -> MythonResult<(String, usize)> {
    let len = chars.len();
    let mut i = idx + 1;
    let mut out = String::new();
    loop {
        if i >= len {
            return Err(MythonError::lexical("unterminated string literal"));
        }
        let c = chars[i];
        if c == quote {
            return Ok((out, i + 1));
        }
        if c == '\n' {
            return Err(MythonError::lexical("string literal cannot span multiple lines"));
        }
        if c == '\\' {
            i += 1;
            if i >= len {
                return Err(MythonError::lexical("unterminated string literal"));
            }
            let escaped = chars[i];
            match escaped {
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
            i += 1;
            continue;
        }
        out.push(c);
        i += 1;
    }
}

/// Matches a two-character operator at `chars[idx]`, falling back to `None`
/// so the caller can emit a single-character `Char` token instead.
fn match_operator(chars: &[char], idx: usize) -> Option<(Token, usize)> {
    let first = chars[idx];
    let second = chars.get(idx + 1).copied();
    match (first, second) {
        ('=', Some('=')) => Some((Token::Eq, 2)),
        ('!', Some('=')) => Some((Token::NotEq, 2)),
        ('<', Some('=')) => Some((Token::LessOrEq, 2)),
        ('>', Some('=')) => Some((Token::GreaterOrEq, 2)),
        _ => None,
    }
}
