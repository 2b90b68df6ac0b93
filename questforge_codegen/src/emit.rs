//! Indentation-aware text emission.
//!
//! Generators never track indentation by hand; they open and close blocks on
//! a [`CodeWriter`] and the writer owns the whitespace.

use std::collections::BTreeSet;
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Line-oriented source builder with brace-block helpers.
#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given depth; used when emitting a fragment that is spliced
    /// into a larger body.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            buf: String::new(),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            self.buf.push('\n');
            return self;
        }
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn comment(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = crate::escape::comment_text(text.as_ref());
        self.line(format!("// {text}"))
    }

    /// Emit `header`, then `{`, and indent everything until [`close_block`](Self::close_block).
    pub fn open_block(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.line("{");
        self.depth += 1;
        self
    }

    pub fn close_block(&mut self) -> &mut Self {
        self.close_block_with("")
    }

    /// Close the current block with a trailing suffix (e.g. `;` or `);`).
    pub fn close_block_with(&mut self, suffix: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(format!("}}{suffix}"))
    }

    /// Emit `header { ... }` around whatever `body` writes.
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.open_block(header);
        body(self);
        self.close_block()
    }

    /// Splice pre-rendered text, shifting every non-empty line to the current depth.
    ///
    /// Relative indentation inside `text` is kept.
    pub fn splice(&mut self, text: &str) -> &mut Self {
        for raw in text.lines() {
            if raw.trim().is_empty() {
                self.blank();
            } else {
                self.line(raw);
            }
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Deduplicated, alphabetically sorted `using` directives.
#[derive(Debug, Default, Clone)]
pub struct UsingSet {
    namespaces: BTreeSet<String>,
}

impl UsingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace; adding one that is already present is a no-op.
    pub fn add(&mut self, namespace: impl Into<String>) -> &mut Self {
        let namespace = namespace.into();
        let trimmed = namespace.trim();
        if !trimmed.is_empty() {
            self.namespaces.insert(trimmed.to_string());
        }
        self
    }

    pub fn extend<I, S>(&mut self, namespaces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ns in namespaces {
            self.add(ns);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Render one `using X;` line per namespace.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for ns in &self.namespaces {
            let _ = writeln!(out, "using {ns};");
        }
        out
    }
}

/// Collapse indentation and blank lines so tests can compare structure, not whitespace.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
