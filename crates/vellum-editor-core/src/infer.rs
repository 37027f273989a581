//! List style inference from typed marker text.
//!
//! Given the few characters the user typed before the caret, decide
//! whether they spell a bullet glyph or a numbered marker, and which
//! style that resolves to. Markers are parsed character-wise; there is no
//! regex here, matching how the rest of the stack recognizes block
//! syntax.

use vellum_model::{
    BulletListType, ListStyleType, NumberingBase, NumberingListType, NumberingSeparator,
};

/// Longest marker text inference looks at.
pub const MARKER_WINDOW: usize = 5;

/// A resolved trigger: the style to create and, for numbered markers,
/// where the sequence starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredListStyle {
    pub style: ListStyleType,
    /// Parsed marker value. `1` means "first item of a new sequence";
    /// anything else is an explicit start override. `None` for bullets.
    pub start_number: Option<u32>,
}

/// Infer a list style from marker text, preferring continuity with the
/// preceding sibling list's style when the marker is ambiguous between
/// alphabetic and roman numbering.
pub fn infer_list_style(
    marker: &str,
    previous: Option<ListStyleType>,
) -> Option<InferredListStyle> {
    if marker.is_empty() || marker.chars().count() > MARKER_WINDOW {
        return None;
    }
    if let Some(bullet) = bullet_style(marker) {
        return Some(InferredListStyle {
            style: ListStyleType::Bullet(bullet),
            start_number: None,
        });
    }
    let (numbering, value) = parse_numbering(marker, previous)?;
    Some(InferredListStyle {
        style: ListStyleType::Numbering(numbering),
        start_number: Some(value),
    })
}

/// The bullet glyph lexicon: each marker maps to a distinct glyph style.
fn bullet_style(marker: &str) -> Option<BulletListType> {
    Some(match marker {
        "*" => BulletListType::Disc,
        "-" => BulletListType::Dash,
        "--" => BulletListType::Square,
        "->" => BulletListType::LongArrow,
        "-->" => BulletListType::DoubleLongArrow,
        "=>" => BulletListType::UnfilledArrow,
        ">" => BulletListType::ShortArrow,
        "\u{2014}" => BulletListType::Hyphen,
        _ => return None,
    })
}

/// Numbered markers: an optional `(`, a 1-2 char token (digits, letters,
/// or a roman numeral), then `.` `)` `>` or `-`. An opening paren must be
/// closed by `)`.
fn parse_numbering(
    marker: &str,
    previous: Option<ListStyleType>,
) -> Option<(NumberingListType, u32)> {
    let (parenthesized, rest) = match marker.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, marker),
    };
    let token_len = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if token_len == 0 || token_len > 2 {
        return None;
    }
    let (token, after) = rest.split_at(token_len);
    let mut after_chars = after.chars();
    let separator_char = after_chars.next()?;
    if after_chars.next().is_some() {
        return None;
    }
    let separator = if parenthesized {
        if separator_char != ')' {
            return None;
        }
        NumberingSeparator::DoubleParenthesis
    } else {
        match separator_char {
            '.' | '>' => NumberingSeparator::Period,
            '-' => NumberingSeparator::Dash,
            ')' => NumberingSeparator::Parenthesis,
            _ => return None,
        }
    };

    let previous_base = match previous {
        Some(ListStyleType::Numbering(numbering)) => Some(numbering.base()),
        _ => None,
    };
    let (base, value) = if token.chars().all(|c| c.is_ascii_digit()) {
        let value: u32 = token.parse().ok()?;
        if value == 0 {
            return None;
        }
        (NumberingBase::Decimal, value)
    } else if token.chars().all(|c| c.is_ascii_alphabetic()) {
        let lowercase = token.chars().next()?.is_ascii_lowercase();
        let continue_roman = previous_base.is_some_and(NumberingBase::is_roman);
        let continue_alpha = previous_base.is_some_and(NumberingBase::is_alpha);
        match parse_roman(token) {
            // A roman-looking token counts as roman when it continues a
            // roman list, or when it is the first numeral of a new one.
            Some(value) if continue_roman || (value == 1 && !continue_alpha) => {
                let base = if lowercase {
                    NumberingBase::LowerRoman
                } else {
                    NumberingBase::UpperRoman
                };
                (base, value)
            }
            _ => {
                let base = if lowercase {
                    NumberingBase::LowerAlpha
                } else {
                    NumberingBase::UpperAlpha
                };
                (base, alpha_value(token)?)
            }
        }
    } else {
        return None;
    };
    Some((NumberingListType::new(base, separator), value))
}

fn parse_roman(token: &str) -> Option<u32> {
    let mut values = Vec::with_capacity(token.len());
    for c in token.chars() {
        values.push(match c.to_ascii_lowercase() {
            'i' => 1i64,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => return None,
        });
    }
    let mut total = 0i64;
    for (idx, &value) in values.iter().enumerate() {
        if values.get(idx + 1).is_some_and(|&next| next > value) {
            total -= value;
        } else {
            total += value;
        }
    }
    (total > 0).then_some(total as u32)
}

/// Spreadsheet-style letter value: `a` = 1, `z` = 26, `aa` = 27.
fn alpha_value(token: &str) -> Option<u32> {
    let mut value = 0u32;
    for c in token.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        value = value * 26 + (c.to_ascii_lowercase() as u32 - 'a' as u32 + 1);
    }
    (value > 0).then_some(value)
}
