use super::{LexerToken, LexerTokenKind};

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human readable position in the raw source */
    pub cur_line: usize,
    pub cur_col: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            chars: chars.chars().peekable(),
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        match self.chars.next() {
            Some(c) => {
                self.cur_col += 1;
                if c == '\n' {
                    self.cur_line += 1;
                    self.cur_col = 1;
                }
                Some(c)
            }
            None => None,
        }
    }

    /// Produce the next instruction token, silently dropping every
    /// character that isn't one of the eight instructions. There is no
    /// error case; a source made entirely of comments lexes to nothing.
    pub fn next_token(&mut self) -> Option<LexerToken> {
        loop {
            let line = self.cur_line;
            let col = self.cur_col;
            let c = self.consume_char()?;
            if let Some(kind) = LexerTokenKind::from_char(c) {
                return Some(LexerToken { kind, line, col });
            }
        }
    }

    pub fn collect_tokens(&mut self) -> Vec<LexerToken> {
        let mut v = vec![];
        while let Some(token) = self.next_token() {
            v.push(token);
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<LexerTokenKind> {
        Lexer::new(source)
            .collect_tokens()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn drops_everything_outside_the_alphabet() {
        assert_eq!(
            kinds("a+b[c]d."),
            vec![
                LexerTokenKind::DerefIncrement,
                LexerTokenKind::JumpStart,
                LexerTokenKind::JumpEnd,
                LexerTokenKind::Write,
            ]
        );
    }

    #[test]
    fn empty_and_comment_only_sources_lex_to_nothing() {
        assert!(kinds("").is_empty());
        assert!(kinds("just some prose; no code at all!?").is_empty());
    }

    #[test]
    fn preserves_source_order() {
        assert_eq!(
            kinds("><+-.,[]"),
            vec![
                LexerTokenKind::Increment,
                LexerTokenKind::Decrement,
                LexerTokenKind::DerefIncrement,
                LexerTokenKind::DerefDecrement,
                LexerTokenKind::Write,
                LexerTokenKind::Read,
                LexerTokenKind::JumpStart,
                LexerTokenKind::JumpEnd,
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = Lexer::new("+\n >").collect_tokens();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 2));
    }
}
