//! List style enumerations and their numeric encodings.
//!
//! The numeric codes are what gets persisted into the per-level dataset
//! (see `metadata`), so both enums expose `code`/`from_code` with the
//! bounds the metadata schema validates against.

use crate::list::ListType;

/// Bullet glyph styles for unordered lists. Codes run 1..=9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BulletListType {
    Disc = 1,
    Dash = 2,
    Square = 3,
    ShortArrow = 4,
    LongArrow = 5,
    UnfilledArrow = 6,
    Hyphen = 7,
    DoubleLongArrow = 8,
    Circle = 9,
}

impl BulletListType {
    /// Lowest valid code.
    pub const MIN: i32 = 1;
    /// Highest valid code.
    pub const MAX: i32 = 9;

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::Disc,
            2 => Self::Dash,
            3 => Self::Square,
            4 => Self::ShortArrow,
            5 => Self::LongArrow,
            6 => Self::UnfilledArrow,
            7 => Self::Hyphen,
            8 => Self::DoubleLongArrow,
            9 => Self::Circle,
            _ => return None,
        })
    }
}

/// The counting scheme of a numbering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingBase {
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl NumberingBase {
    pub fn is_roman(self) -> bool {
        matches!(self, Self::LowerRoman | Self::UpperRoman)
    }

    pub fn is_alpha(self) -> bool {
        matches!(self, Self::LowerAlpha | Self::UpperAlpha)
    }
}

/// The punctuation following (or wrapping) a rendered number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingSeparator {
    Period,
    Dash,
    Parenthesis,
    DoubleParenthesis,
}

/// Numbering styles for ordered lists: every base/separator combination,
/// with codes 1..=20 laid out base-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NumberingListType {
    Decimal = 1,
    DecimalDash = 2,
    DecimalParenthesis = 3,
    DecimalDoubleParenthesis = 4,
    LowerAlpha = 5,
    LowerAlphaDash = 6,
    LowerAlphaParenthesis = 7,
    LowerAlphaDoubleParenthesis = 8,
    UpperAlpha = 9,
    UpperAlphaDash = 10,
    UpperAlphaParenthesis = 11,
    UpperAlphaDoubleParenthesis = 12,
    LowerRoman = 13,
    LowerRomanDash = 14,
    LowerRomanParenthesis = 15,
    LowerRomanDoubleParenthesis = 16,
    UpperRoman = 17,
    UpperRomanDash = 18,
    UpperRomanParenthesis = 19,
    UpperRomanDoubleParenthesis = 20,
}

impl NumberingListType {
    /// Lowest valid code.
    pub const MIN: i32 = 1;
    /// Highest valid code.
    pub const MAX: i32 = 20;

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        if !(Self::MIN..=Self::MAX).contains(&code) {
            return None;
        }
        let base = match (code - 1) / 4 {
            0 => NumberingBase::Decimal,
            1 => NumberingBase::LowerAlpha,
            2 => NumberingBase::UpperAlpha,
            3 => NumberingBase::LowerRoman,
            _ => NumberingBase::UpperRoman,
        };
        let separator = match (code - 1) % 4 {
            0 => NumberingSeparator::Period,
            1 => NumberingSeparator::Dash,
            2 => NumberingSeparator::Parenthesis,
            _ => NumberingSeparator::DoubleParenthesis,
        };
        Some(Self::new(base, separator))
    }

    /// Compose a style from its base and separator.
    pub fn new(base: NumberingBase, separator: NumberingSeparator) -> Self {
        use NumberingBase as B;
        use NumberingSeparator as S;
        match (base, separator) {
            (B::Decimal, S::Period) => Self::Decimal,
            (B::Decimal, S::Dash) => Self::DecimalDash,
            (B::Decimal, S::Parenthesis) => Self::DecimalParenthesis,
            (B::Decimal, S::DoubleParenthesis) => Self::DecimalDoubleParenthesis,
            (B::LowerAlpha, S::Period) => Self::LowerAlpha,
            (B::LowerAlpha, S::Dash) => Self::LowerAlphaDash,
            (B::LowerAlpha, S::Parenthesis) => Self::LowerAlphaParenthesis,
            (B::LowerAlpha, S::DoubleParenthesis) => Self::LowerAlphaDoubleParenthesis,
            (B::UpperAlpha, S::Period) => Self::UpperAlpha,
            (B::UpperAlpha, S::Dash) => Self::UpperAlphaDash,
            (B::UpperAlpha, S::Parenthesis) => Self::UpperAlphaParenthesis,
            (B::UpperAlpha, S::DoubleParenthesis) => Self::UpperAlphaDoubleParenthesis,
            (B::LowerRoman, S::Period) => Self::LowerRoman,
            (B::LowerRoman, S::Dash) => Self::LowerRomanDash,
            (B::LowerRoman, S::Parenthesis) => Self::LowerRomanParenthesis,
            (B::LowerRoman, S::DoubleParenthesis) => Self::LowerRomanDoubleParenthesis,
            (B::UpperRoman, S::Period) => Self::UpperRoman,
            (B::UpperRoman, S::Dash) => Self::UpperRomanDash,
            (B::UpperRoman, S::Parenthesis) => Self::UpperRomanParenthesis,
            (B::UpperRoman, S::DoubleParenthesis) => Self::UpperRomanDoubleParenthesis,
        }
    }

    pub fn base(self) -> NumberingBase {
        match (self.code() - 1) / 4 {
            0 => NumberingBase::Decimal,
            1 => NumberingBase::LowerAlpha,
            2 => NumberingBase::UpperAlpha,
            3 => NumberingBase::LowerRoman,
            _ => NumberingBase::UpperRoman,
        }
    }

    pub fn separator(self) -> NumberingSeparator {
        match (self.code() - 1) % 4 {
            0 => NumberingSeparator::Period,
            1 => NumberingSeparator::Dash,
            2 => NumberingSeparator::Parenthesis,
            _ => NumberingSeparator::DoubleParenthesis,
        }
    }
}

/// A resolved list style: either a bullet glyph or a numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyleType {
    Bullet(BulletListType),
    Numbering(NumberingListType),
}

impl ListStyleType {
    /// The list kind this style renders as.
    pub fn list_type(self) -> ListType {
        match self {
            Self::Bullet(_) => ListType::Unordered,
            Self::Numbering(_) => ListType::Ordered,
        }
    }
}
