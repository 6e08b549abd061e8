//! Inline body markup.
//!
//! Bodies are opaque strings; the only structure recognized here is what the
//! terminal can display: `<b>`/`<strong>`, `<i>`/`<em>`, `<u>` as modifiers and
//! `<br>` as a line break. Every other tag is ordinary text.

use ratatui::style::Modifier;

pub const LINE_BREAK: &str = "<br>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Tag {
        name: String,
        closing: bool,
        raw: &'a str,
    },
}

/// Split markup into text runs and well-formed tags. An unterminated `<` is
/// kept as text.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;
    let bytes = input.as_bytes();

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some((name, closing, end)) = parse_tag(input, i) {
                if text_start < i {
                    tokens.push(Token::Text(&input[text_start..i]));
                }
                tokens.push(Token::Tag {
                    name,
                    closing,
                    raw: &input[i..end],
                });
                i = end;
                text_start = end;
                continue;
            }
        }
        i += 1;
    }
    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

fn parse_tag(input: &str, start: usize) -> Option<(String, bool, usize)> {
    let rest = &input[start + 1..];
    let close = rest.find('>')?;
    let inner = &rest[..close];
    if inner.contains('<') {
        return None;
    }
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((name.to_ascii_lowercase(), closing, start + 1 + close + 1))
}

fn modifier_for(name: &str) -> Option<Modifier> {
    match name {
        "b" | "strong" => Some(Modifier::BOLD),
        "i" | "em" => Some(Modifier::ITALIC),
        "u" => Some(Modifier::UNDERLINED),
        _ => None,
    }
}

pub fn is_line_break(name: &str) -> bool {
    name == "br"
}

/// Open formatting carried from one piece of markup to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineState {
    bold: u16,
    italic: u16,
    underline: u16,
}

impl InlineState {
    pub fn modifier(&self) -> Modifier {
        let mut m = Modifier::empty();
        if self.bold > 0 {
            m |= Modifier::BOLD;
        }
        if self.italic > 0 {
            m |= Modifier::ITALIC;
        }
        if self.underline > 0 {
            m |= Modifier::UNDERLINED;
        }
        m
    }

    /// Apply a tag; returns false for tags that carry no formatting.
    fn apply(&mut self, name: &str, closing: bool) -> bool {
        let Some(modifier) = modifier_for(name) else {
            return false;
        };
        let counter = if modifier == Modifier::BOLD {
            &mut self.bold
        } else if modifier == Modifier::ITALIC {
            &mut self.italic
        } else {
            &mut self.underline
        };
        if closing {
            *counter = counter.saturating_sub(1);
        } else {
            *counter = counter.saturating_add(1);
        }
        true
    }
}

/// Display style of one source character in the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    pub is_tag: bool,
    pub modifier: Modifier,
}

/// Classify every character of a source line, tags included.
pub fn classify_line(line: &str, state: &mut InlineState) -> Vec<CharClass> {
    let mut classes = Vec::with_capacity(line.len());
    for token in tokenize(line) {
        match token {
            Token::Text(text) => {
                let modifier = state.modifier();
                classes.extend(text.chars().map(|_| CharClass {
                    is_tag: false,
                    modifier,
                }));
            }
            Token::Tag { name, closing, raw } => {
                let known = state.apply(&name, closing) || is_line_break(&name);
                let modifier = state.modifier();
                classes.extend(raw.chars().map(|_| CharClass {
                    is_tag: known,
                    modifier,
                }));
            }
        }
    }
    classes
}

/// Rendered text runs with formatting tags removed and line breaks shown as
/// spaces.
pub fn styled_runs(markup: &str) -> Vec<(String, Modifier)> {
    let mut runs: Vec<(String, Modifier)> = Vec::new();
    let mut state = InlineState::default();

    let push = |text: &str, modifier: Modifier, runs: &mut Vec<(String, Modifier)>| {
        if text.is_empty() {
            return;
        }
        match runs.last_mut() {
            Some((last, m)) if *m == modifier => last.push_str(text),
            _ => runs.push((text.to_string(), modifier)),
        }
    };

    for token in tokenize(markup) {
        match token {
            Token::Text(text) => push(text, state.modifier(), &mut runs),
            Token::Tag { name, closing, raw } => {
                if is_line_break(&name) {
                    push(" ", state.modifier(), &mut runs);
                } else if !state.apply(&name, closing) {
                    push(raw, state.modifier(), &mut runs);
                }
            }
        }
    }
    runs
}

/// Body markup as editable source lines. `<br>` variants and raw newlines
/// both start a new line.
pub fn body_to_lines(body: &str) -> Vec<String> {
    let mut lines = vec![String::new()];
    for token in tokenize(body) {
        match token {
            Token::Tag { ref name, closing: false, .. } if is_line_break(name) => {
                lines.push(String::new());
            }
            Token::Tag { raw, .. } => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(raw);
                }
            }
            Token::Text(text) => {
                let mut parts = text.split('\n');
                if let (Some(first), Some(last)) = (parts.next(), lines.last_mut()) {
                    last.push_str(first.strip_suffix('\r').unwrap_or(first));
                }
                for part in parts {
                    lines.push(part.strip_suffix('\r').unwrap_or(part).to_string());
                }
            }
        }
    }
    lines
}

pub fn lines_to_body(lines: &[String]) -> String {
    lines.join(LINE_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens = tokenize("a<b>bold</b> <x");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], Token::Text("a"));
        assert!(matches!(&tokens[1], Token::Tag { name, closing: false, .. } if name == "b"));
        assert!(matches!(&tokens[3], Token::Tag { name, closing: true, .. } if name == "b"));
        assert_eq!(tokens[4], Token::Text(" <x"));
    }

    #[test]
    fn test_tag_with_attributes() {
        let tokens = tokenize(r#"<span style="font-size: 20px">x</span>"#);
        assert!(matches!(&tokens[0], Token::Tag { name, .. } if name == "span"));
        assert_eq!(tokens[1], Token::Text("x"));
    }

    #[test]
    fn test_comparison_is_not_a_tag() {
        assert_eq!(tokenize("1 < 2 > 0"), vec![Token::Text("1 < 2 > 0")]);
    }

    #[test]
    fn test_styled_runs_hide_format_tags() {
        let runs = styled_runs("plain <b>bold <i>both</i></b>");
        assert_eq!(runs[0], ("plain ".to_string(), Modifier::empty()));
        assert_eq!(runs[1], ("bold ".to_string(), Modifier::BOLD));
        assert_eq!(runs[2], ("both".to_string(), Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn test_styled_runs_keep_unknown_tags() {
        let runs = styled_runs("<div>x</div>");
        assert_eq!(runs, vec![("<div>x</div>".to_string(), Modifier::empty())]);
    }

    #[test]
    fn test_classify_marks_tags() {
        let mut state = InlineState::default();
        let classes = classify_line("<u>a</u>b", &mut state);
        assert_eq!(classes.len(), 9);
        assert!(classes[0].is_tag);
        assert_eq!(classes[3], CharClass { is_tag: false, modifier: Modifier::UNDERLINED });
        assert_eq!(classes[8].modifier, Modifier::empty());
    }

    #[test]
    fn test_state_carries_across_lines() {
        let mut state = InlineState::default();
        classify_line("<b>start", &mut state);
        let next = classify_line("end</b>", &mut state);
        assert_eq!(next[0].modifier, Modifier::BOLD);
    }

    #[test]
    fn test_body_lines_round_trip() {
        let lines = body_to_lines("one<br>two<br/>three<BR />four\nfive");
        assert_eq!(lines, vec!["one", "two", "three", "four", "five"]);
        assert_eq!(lines_to_body(&lines[..2]), "one<br>two");
        assert_eq!(body_to_lines(""), vec![String::new()]);
    }

    #[test]
    fn test_break_variants_save_as_br() {
        let body = "a<br/>b\nc<BR />d";
        assert_eq!(lines_to_body(&body_to_lines(body)), "a<br>b<br>c<br>d");
        // formatting tags pass through untouched
        assert_eq!(lines_to_body(&body_to_lines("<b>x</b><br />y")), "<b>x</b><br>y");
    }
}
