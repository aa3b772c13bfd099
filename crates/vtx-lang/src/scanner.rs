/// Marker starting a comment line.
pub const COMMENT_MARKER: &str = "//";

/// A trimmed, non-empty, non-comment line of input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    pub text: &'a str,
}

/// Lazily yields the logical lines of a source text.
///
/// Scanning is restartable by constructing a new scanner over the same text.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> LineScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, raw) in self.lines.by_ref() {
            let text = raw.trim();
            if text.is_empty() || text.starts_with(COMMENT_MARKER) {
                continue;
            }

            return Some(Line {
                number: idx + 1,
                text,
            });
        }

        None
    }
}
