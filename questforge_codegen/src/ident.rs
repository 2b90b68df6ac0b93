//! Identifier sanitizing for generated C# source.
//!
//! User text (class names, objective names, mod names) is turned into a
//! legal identifier here. Sanitizing is deterministic but does not make
//! names unique; run [`ensure_unique`] against a scope's used-name set for that.

use std::collections::HashSet;

use unicode_ident::{is_xid_continue, is_xid_start};

/// Reserved C# keywords that cannot be used as bare identifiers.
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const",
    "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern",
    "false", "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface",
    "internal", "is", "lock", "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof",
    "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

/// True when `word` is a reserved C# keyword.
pub fn is_keyword(word: &str) -> bool {
    CSHARP_KEYWORDS.contains(&word)
}

fn is_ident_start(ch: char) -> bool {
    is_xid_start(ch) || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    is_xid_continue(ch)
}

/// Convert arbitrary text into a valid identifier, or return `fallback`.
///
/// The leading character must be a letter or underscore: a leading digit is
/// kept behind an underscore, any other illegal leading character (including
/// a combining mark) is dropped. After that, letters, digits, marks and
/// underscores pass through and everything else becomes `_`. A result that collides with a keyword gets a `_` prefix.
///
/// ```
/// use questforge_codegen::ident::sanitize;
///
/// assert_eq!(sanitize("My Quest!", "Quest"), "My_Quest_");
/// assert_eq!(sanitize("2ndQuest", "Quest"), "_2ndQuest");
/// assert_eq!(sanitize("   ", "Quest"), "Quest");
/// ```
pub fn sanitize(candidate: &str, fallback: &str) -> String {
    if candidate.trim().is_empty() {
        return fallback.to_string();
    }

    let mut out = String::with_capacity(candidate.len() + 1);
    for ch in candidate.chars() {
        if out.is_empty() {
            if is_ident_start(ch) {
                out.push(ch);
            } else if ch.is_ascii_digit() {
                out.push('_');
                out.push(ch);
            }
            continue;
        }
        if is_ident_char(ch) {
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    if out.is_empty() {
        return fallback.to_string();
    }
    if is_keyword(&out) {
        out.insert(0, '_');
    }
    out
}

/// Sanitize a dotted namespace segment by segment.
///
/// Empty segments are dropped; if nothing survives, `fallback` is returned.
pub fn sanitize_namespace(candidate: &str, fallback: &str) -> String {
    let segments: Vec<String> = candidate
        .split('.')
        .filter(|seg| !seg.trim().is_empty())
        .map(|seg| sanitize(seg, ""))
        .filter(|seg| !seg.is_empty())
        .collect();
    if segments.is_empty() {
        fallback.to_string()
    } else {
        segments.join(".")
    }
}

/// Make `identifier` unique within `used` and record it.
///
/// Collisions get `_1`, `_2`, ... appended until an unused name is found. An
/// empty identifier is replaced by `item{index_hint}` before the check. The
/// chosen name is inserted into `used` before returning, so calling this in
/// processing order yields deterministic output.
pub fn ensure_unique(identifier: &str, used: &mut HashSet<String>, index_hint: usize) -> String {
    let chosen = pick_unique(identifier, index_hint, |name| used.contains(name));
    used.insert(chosen.clone());
    chosen
}

/// [`ensure_unique`] for names that become file names: `Foo` and `foo`
/// collide, since they are the same file on Windows and macOS.
///
/// `used` holds ASCII-lowercased names.
pub fn ensure_unique_ignore_case(identifier: &str, used: &mut HashSet<String>, index_hint: usize) -> String {
    let chosen = pick_unique(identifier, index_hint, |name| used.contains(&name.to_ascii_lowercase()));
    used.insert(chosen.to_ascii_lowercase());
    chosen
}

fn pick_unique(identifier: &str, index_hint: usize, taken: impl Fn(&str) -> bool) -> String {
    let base = if identifier.is_empty() {
        format!("item{index_hint}")
    } else {
        identifier.to_string()
    };

    let mut chosen = base.clone();
    let mut suffix = 1usize;
    while taken(&chosen) {
        chosen = format!("{base}_{suffix}");
        suffix += 1;
    }
    chosen
}
