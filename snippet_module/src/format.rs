//! Line extraction and code-block formatting.

use std::fmt;

use crate::patterns::LineSpan;

/// Inserted after every backtick so file contents cannot close the fence.
pub const BACKTICK_ESCAPE: char = '\u{200d}';

/// Concrete 1-based inclusive range, already swapped and clamped to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Resolve a requested span against a file of `total_lines` lines.
    ///
    /// Returns `None` when the request lies entirely outside the file, which
    /// callers treat as "nothing to show" rather than an error.
    pub fn resolve(requested: Option<LineSpan>, total_lines: usize) -> Option<Self> {
        if total_lines == 0 {
            return None;
        }

        let (start, end) = match requested {
            None => (1, total_lines),
            Some(span) => (span.start, span.end.unwrap_or(span.start)),
        };
        let (start, end) = if start > end { (end, start) } else { (start, end) };

        if start > total_lines || end < 1 {
            return None;
        }

        Some(Self {
            start: start.max(1),
            end: end.min(total_lines),
        })
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

/// One rendered snippet: a header line naming the file and range, then a fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSnippet {
    pub header_text: String,
    pub code_block: String,
}

impl FormattedSnippet {
    /// True when the range resolved but contained nothing printable.
    pub fn is_blank(&self) -> bool {
        self.code_block == EMPTY_CODE_BLOCK
    }
}

impl fmt::Display for FormattedSnippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header_text, self.code_block)
    }
}

const EMPTY_CODE_BLOCK: &str = "``` ```\n";

/// Extract `lines` from `contents` and render them as a tagged code block.
///
/// `file_path` is the display path; it names the file in the header and
/// supplies the language tag.
pub fn render_snippet(
    contents: &str,
    file_path: &str,
    lines: Option<LineSpan>,
) -> Option<FormattedSnippet> {
    let all_lines: Vec<&str> = contents.lines().collect();
    let range = LineRange::resolve(lines, all_lines.len())?;

    let selected = all_lines[range.start - 1..range.end].join("\n");
    let body = escape_backticks(dedent(&selected).trim_end());

    let header_text = if range.is_single_line() {
        format!("`{}` line {}\n", file_path, range.start)
    } else {
        format!("`{}` lines {} to {}\n", file_path, range.start, range.end)
    };
    let code_block = if body.is_empty() {
        EMPTY_CODE_BLOCK.to_string()
    } else {
        format!("```{}\n{}```\n", language_tag(file_path), body)
    };

    Some(FormattedSnippet {
        header_text,
        code_block,
    })
}

/// Remove the whitespace margin shared by every non-blank line.
///
/// Spaces and tabs are compared literally (tabs are not expanded), so a tab
/// and a run of spaces never form a common margin. Lines holding only
/// whitespace do not take part and come out empty.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        if is_blank(line) {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin_len = margin.map_or(0, str::len);

    text.split('\n')
        .map(|line| if is_blank(line) { "" } else { &line[margin_len..] })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.trim_matches([' ', '\t']).is_empty()
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((idx, ch), _)| idx + ch.len_utf8());
    &a[..len]
}

pub fn escape_backticks(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        escaped.push(ch);
        if ch == '`' {
            escaped.push(BACKTICK_ESCAPE);
        }
    }
    escaped
}

/// Language tag from the file name's extension; empty when there is none
/// or it is not a plain identifier.
pub fn language_tag(file_path: &str) -> &str {
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);
    match file_name.rsplit_once('.') {
        Some((_, ext))
            if ext.chars().any(char::is_alphanumeric)
                && ext
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '-' | '+' | '_')) =>
        {
            ext
        }
        _ => "",
    }
}
