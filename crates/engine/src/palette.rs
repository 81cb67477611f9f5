//! Category colors for the breakdown bars.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Red,
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
    Teal,
}

/// Fixed cycle; position `i` in a breakdown gets `PALETTE[i % 7]`.
pub const PALETTE: [ColorToken; 7] = [
    ColorToken::Red,
    ColorToken::Blue,
    ColorToken::Purple,
    ColorToken::Green,
    ColorToken::Orange,
    ColorToken::Pink,
    ColorToken::Teal,
];

impl ColorToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Teal => "teal",
        }
    }
}

#[must_use]
pub fn color_for(position: usize) -> ColorToken {
    PALETTE[position % PALETTE.len()]
}
