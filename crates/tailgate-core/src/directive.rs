//! Directive lexer for the policy block syntax.
//!
//! One directive per line: a keyword followed by whitespace-separated
//! arguments. A token starting with `#` begins a comment that runs to the end
//! of the line. Blank and comment-only lines produce no directive.

/// A single parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// 1-based line number in the source text.
    pub line: usize,
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

/// Split `text` into directives, borrowing tokens from the input.
pub fn parse_directives(text: &str) -> Vec<Directive<'_>> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let mut tokens = raw
            .split_whitespace()
            .take_while(|tok| !tok.starts_with('#'));

        let Some(name) = tokens.next() else { continue };
        out.push(Directive {
            line: idx + 1,
            name,
            args: tokens.collect(),
        });
    }
    out
}
