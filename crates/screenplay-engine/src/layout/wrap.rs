/// Char offsets at which each wrapped line of `text` starts.
///
/// Greedy word wrap at `width` monospaced chars. Words longer than a line are
/// hard-broken, explicit newlines always start a new line, and empty text
/// still occupies one line. The first entry is always 0.
pub fn line_starts(text: &str, width: usize) -> Vec<usize> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut starts = vec![0];

    let mut paragraph_start = 0;
    while paragraph_start <= chars.len() {
        let paragraph_end = chars[paragraph_start..]
            .iter()
            .position(|c| *c == '\n')
            .map(|p| paragraph_start + p)
            .unwrap_or(chars.len());

        wrap_paragraph(&chars, paragraph_start, paragraph_end, width, &mut starts);

        if paragraph_end == chars.len() {
            break;
        }
        paragraph_start = paragraph_end + 1;
        starts.push(paragraph_start);
    }

    starts
}

fn wrap_paragraph(chars: &[char], start: usize, end: usize, width: usize, starts: &mut Vec<usize>) {
    let mut line_start = start;
    while end - line_start > width {
        let limit = line_start + width;
        let next = match chars[line_start..=limit]
            .iter()
            .rposition(|c| c.is_whitespace())
        {
            Some(p) if p > 0 => {
                let mut next = line_start + p + 1;
                while next < end && chars[next].is_whitespace() {
                    next += 1;
                }
                next
            }
            _ => limit,
        };
        if next >= end {
            break;
        }
        starts.push(next);
        line_start = next;
    }
}

/// Number of wrapped lines, at least 1.
pub fn line_count(text: &str, width: usize) -> usize {
    line_starts(text, width).len()
}
