//! Parse check for emitted C# text.
//!
//! This does not type-check anything. It only proves that every string, char
//! literal and comment terminates and that braces, parentheses and brackets
//! nest correctly, which is what a code generator gets wrong in practice.

use pest::Parser;
use pest::error::{InputLocation, LineColLocation};
use pest_derive::Parser as PestParser;

use crate::error::SyntaxError;

#[derive(PestParser)]
#[grammar = "src/csharp.pest"]
struct TokenTreeParser;

/// Check that `source` parses as a balanced token tree.
///
/// # Errors
/// Returns the first position where the text stops parsing.
pub fn check_syntax(source: &str) -> Result<(), SyntaxError> {
    TokenTreeParser::parse(Rule::file, source).map(|_| ()).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
        };
        let offset = match e.location {
            InputLocation::Pos(p) | InputLocation::Span((p, _)) => p,
        };
        let message = match source.get(offset..).and_then(|rest| rest.chars().next()) {
            None => "unexpected end of input; a block is not closed".to_string(),
            Some('"' | '\'' | '/' | '@' | '$') => "unterminated literal or comment".to_string(),
            Some(c) => format!("unexpected '{c}'"),
        };
        SyntaxError { line, column, message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_shapes() {
        let src = r#"
// header
using System;

namespace Demo.Quests
{
    /// <summary>x</summary>
    public class Demo : Quest
    {
        public static readonly int[] RequiredProgress = { 1, 3 };
        private const string Path = @"C:\Games\""quoted""";
        private char c = '\'';

        protected override void OnCreated()
        {
            var s = $"{QuestId} has {{braces}} and {"nested"}";
            Player.OnDeath += () =>
            {
                if (State == QuestState.Active) { Fail(); } /* done */
            };
        }
    }
}
"#;
        assert_eq!(check_syntax(src), Ok(()));
    }

    #[test]
    fn brackets_inside_literals_are_ignored() {
        assert!(check_syntax("var a = \"}}}\"; // {{{").is_ok());
        assert!(check_syntax("var a = '{';").is_ok());
    }

    #[test]
    fn rejects_unbalanced_braces() {
        let err = check_syntax("class A\n{\n    void M() {\n}\n").unwrap_err();
        assert!(err.line >= 1);
        assert!(check_syntax("class A { ( }").is_err());
        assert!(check_syntax("}").is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = check_syntax("var x = \"open;\nvar y = 1;").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_unterminated_block_comment() {
        assert!(check_syntax("int x; /* never closed").is_err());
    }
}
