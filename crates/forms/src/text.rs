//! Text preparation for the PDF's built-in fonts.
//!
//! The standard Type 1 fonts only cover a single-byte encoding, so every string drawn on the
//! form is reduced to ASCII first, and long fields are word-wrapped by character count.

/// Typographic characters and their ASCII stand-ins.
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2014}', "-"),
    ('\u{2013}', "-"),
    ('\u{2022}', "-"),
    ('\u{2026}', "..."),
    ('\u{00a0}', " "),
    ('\u{20ac}', "EUR"),
    ('\u{00a3}', "GBP"),
    ('\u{00a5}', "YEN"),
    ('\u{00b1}', "+/-"),
    ('\u{00d7}', "x"),
    ('\u{00f7}', "/"),
];

/// Normalise smart punctuation to ASCII and drop anything else outside ASCII.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some((_, replacement)) = REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            out.push_str(replacement);
        }
    }
    out
}

/// Greedy word wrap by character count.
///
/// Words are accumulated while the line stays within `max_chars`; a single word longer than
/// the budget gets a line of its own. At most `max_lines` lines are returned and the rest is
/// dropped.
pub fn wrap_words(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.truncate(max_lines);
    lines
}

/// Capitalise the first letter of each word and lower-case the rest.
///
/// Underscores are treated as word separators and rendered as spaces.
pub fn title_case(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
