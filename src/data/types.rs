use serde::{Deserialize, Serialize};

/// Regional exchange of the A-share market
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Market {
    SH,
    SZ,
}

impl Market {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SH => "SH",
            Self::SZ => "SZ",
        }
    }

    /// Markets in fetch order (SH before SZ)
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    /// Guess the listing market of a six digit security code
    pub fn of_code(code: &str) -> Self {
        if code.trim().starts_with(['5', '6', '9']) {
            Self::SH
        } else {
            Self::SZ
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional signal of a price or flow delta
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorState {
    Up,
    Down,
    #[default]
    Neutral,
}

/// Which color marks a rising price
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, bytemuck::NoUninit,
)]
#[repr(u8)]
pub enum StockColorMode {
    #[default]
    RedUp,
    GreenUp,
}
