//! Script text lexing
//!
//! Tokenizer, brace skipper and comment/whitespace compressor for the
//! shader script syntax. Tokens are whitespace-delimited words or quoted
//! strings; `//` and `/* */` comments are skipped.

/// Cursor over script text that yields tokens.
///
/// Tokens borrow from the underlying text. An empty token marks the end of
/// input (or, when line crossing is disabled, the end of the current line).
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    token_start: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self::at(text, 0)
    }

    /// Create a lexer positioned at byte offset `pos` of `text`.
    pub fn at(text: &'a str, pos: usize) -> Self {
        let pos = pos.min(text.len());
        Self {
            text,
            pos,
            token_start: pos,
            line: 1,
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset where the most recent token began (at its quote, for
    /// quoted tokens).
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Current line number (1-based), counted from where the lexer started.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Text that has not been consumed yet.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Read the next token.
    ///
    /// With `cross_lines == false`, returns an empty token instead of
    /// reading past a line break; the cursor then sits at the start of the
    /// next line's content.
    pub fn next_token(&mut self, cross_lines: bool) -> &'a str {
        let bytes = self.text.as_bytes();
        let mut has_newlines = false;

        loop {
            while self.pos < bytes.len() && bytes[self.pos] <= b' ' {
                if bytes[self.pos] == b'\n' {
                    self.line += 1;
                    has_newlines = true;
                }
                self.pos += 1;
            }

            self.token_start = self.pos;
            if self.pos >= bytes.len() {
                return "";
            }
            if has_newlines && !cross_lines {
                return "";
            }

            let rest = &bytes[self.pos..];
            if rest.starts_with(b"//") {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if rest.starts_with(b"/*") {
                self.pos += 2;
                while self.pos < bytes.len() && !bytes[self.pos..].starts_with(b"*/") {
                    if bytes[self.pos] == b'\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
                self.pos = (self.pos + 2).min(bytes.len());
            } else {
                break;
            }
        }

        self.token_start = self.pos;
        if bytes[self.pos] == b'"' {
            self.pos += 1;
            let start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos] != b'"' {
                if bytes[self.pos] == b'\n' {
                    self.line += 1;
                }
                self.pos += 1;
            }
            let token = &self.text[start..self.pos];
            if self.pos < bytes.len() {
                self.pos += 1;
            }
            return token;
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] > b' ' {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// Consume tokens until the brace nesting reaches zero.
    ///
    /// `depth` is the nesting already entered; pass 0 when the cursor sits
    /// before the opening brace and 1 when it has been consumed. Returns
    /// `false` if the text ends while a brace is still open.
    pub fn skip_braced_section(&mut self, depth: u32) -> bool {
        let mut depth = i64::from(depth);
        loop {
            let token = self.next_token(true);
            match token {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
            if depth == 0 || token.is_empty() {
                break;
            }
        }
        depth == 0
    }

    /// Skip to the start of the next line.
    pub fn skip_rest_of_line(&mut self) {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let byte = bytes[self.pos];
            self.pos += 1;
            if byte == b'\n' {
                self.line += 1;
                break;
            }
        }
    }
}

/// Strip comments and collapse whitespace.
///
/// Runs of spaces and tabs become one space, runs containing a line break
/// become one newline, quoted strings are copied untouched.
pub fn compress(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut newline = false;
    let mut whitespace = false;

    while pos < bytes.len() {
        let rest = &bytes[pos..];
        if rest.starts_with(b"//") {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else if rest.starts_with(b"/*") {
            pos += 2;
            while pos < bytes.len() && !bytes[pos..].starts_with(b"*/") {
                pos += 1;
            }
            pos = (pos + 2).min(bytes.len());
        } else if matches!(bytes[pos], b'\n' | b'\r') {
            newline = true;
            pos += 1;
        } else if matches!(bytes[pos], b' ' | b'\t') {
            whitespace = true;
            pos += 1;
        } else {
            if newline {
                out.push('\n');
                newline = false;
                whitespace = false;
            }
            if whitespace {
                out.push(' ');
                whitespace = false;
            }

            if bytes[pos] == b'"' {
                let start = pos;
                pos += 1;
                while pos < bytes.len() && bytes[pos] != b'"' {
                    pos += 1;
                }
                if pos < bytes.len() {
                    pos += 1;
                }
                out.push_str(&text[start..pos]);
            } else {
                let len = text[pos..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&text[pos..pos + len]);
                pos += len;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_split_on_whitespace() {
        let mut lexer = Lexer::new("textures/base/wall {\n\tmap $lightmap\n}");
        assert_eq!(lexer.next_token(true), "textures/base/wall");
        assert_eq!(lexer.next_token(true), "{");
        assert_eq!(lexer.next_token(true), "map");
        assert_eq!(lexer.next_token(true), "$lightmap");
        assert_eq!(lexer.next_token(true), "}");
        assert_eq!(lexer.next_token(true), "");
        assert!(lexer.is_at_end());
    }

    #[test]
    fn comments_are_skipped() {
        let mut lexer = Lexer::new("// header\nfirst /* block\ncomment */ second");
        assert_eq!(lexer.next_token(true), "first");
        assert_eq!(lexer.next_token(true), "second");
        assert_eq!(lexer.line(), 3);
    }

    #[test]
    fn quoted_tokens_keep_spaces() {
        let mut lexer = Lexer::new("\"menu back\" next");
        assert_eq!(lexer.next_token(true), "menu back");
        assert_eq!(lexer.token_start(), 0);
        assert_eq!(lexer.next_token(true), "next");
        assert_eq!(lexer.token_start(), 12);
    }

    #[test]
    fn line_bound_tokens_stop_at_newline() {
        let mut lexer = Lexer::new("blendFunc add\nrgbGen identity");
        assert_eq!(lexer.next_token(false), "blendFunc");
        assert_eq!(lexer.next_token(false), "add");
        assert_eq!(lexer.next_token(false), "");
        assert_eq!(lexer.next_token(true), "rgbGen");
    }

    #[test]
    fn skip_braced_section_balances_nesting() {
        let mut lexer = Lexer::new("{ a { b } c } after");
        assert!(lexer.skip_braced_section(0));
        assert_eq!(lexer.next_token(true), "after");

        let mut lexer = Lexer::new("inner { x } } tail");
        assert!(lexer.skip_braced_section(1));
        assert_eq!(lexer.next_token(true), "tail");
    }

    #[test]
    fn skip_braced_section_reports_missing_close() {
        let mut lexer = Lexer::new("{ a { b }");
        assert!(!lexer.skip_braced_section(0));
        assert!(lexer.is_at_end());
    }

    #[test]
    fn skip_rest_of_line_moves_to_next_line() {
        let mut lexer = Lexer::new("cull none extra\nsort 6");
        assert_eq!(lexer.next_token(true), "cull");
        lexer.skip_rest_of_line();
        assert_eq!(lexer.next_token(true), "sort");
        assert_eq!(lexer.line(), 2);
    }

    #[test]
    fn compress_strips_comments_and_whitespace() {
        let text = "// comment\nwall\n{\n\t\tmap   a.tga // trailing\n\n}\n";
        assert_eq!(compress(text), "\nwall\n{\nmap a.tga\n}");
    }

    #[test]
    fn compress_keeps_quoted_strings() {
        assert_eq!(compress("say   \"two  words\"  end"), "say \"two  words\" end");
        assert_eq!(compress("a/* gone */b"), "ab");
    }

    #[test]
    fn compress_preserves_non_ascii() {
        assert_eq!(compress("caf\u{e9}  bar"), "caf\u{e9} bar");
    }
}
