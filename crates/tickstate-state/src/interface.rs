//! Client window layout.

use std::fmt;

use serde::{Deserialize, Serialize};
use tickstate_core::constants::panels;

/// Which top-level layout the client is using.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceMode {
    /// Fixed-size classic window.
    Fixed,
    /// Resizable with the classic side panel.
    ResizableClassic,
    /// Resizable with the bottom-line side panel.
    ResizableModern,
    /// Not yet detected.
    #[default]
    Unknown,
}

impl InterfaceMode {
    /// Detect from the client's resized flag and the arrangement counter
    /// (`1` selects the modern layout).
    #[must_use]
    pub fn from_layout(resized: bool, arrangement: i32) -> Self {
        match (resized, arrangement) {
            (false, _) => Self::Fixed,
            (true, 1) => Self::ResizableModern,
            (true, _) => Self::ResizableClassic,
        }
    }

    /// Fixed layout.
    #[must_use]
    pub fn is_fixed(self) -> bool {
        self == Self::Fixed
    }

    /// Either resizable layout.
    #[must_use]
    pub fn is_resizable(self) -> bool {
        matches!(self, Self::ResizableClassic | Self::ResizableModern)
    }

    /// Root panel id of the layout.
    #[must_use]
    pub fn top_level_panel_id(self) -> Option<i32> {
        match self {
            Self::Fixed => Some(panels::TOPLEVEL_FIXED),
            Self::ResizableClassic => Some(panels::TOPLEVEL_RESIZABLE_CLASSIC),
            Self::ResizableModern => Some(panels::TOPLEVEL_RESIZABLE_MODERN),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed",
            Self::ResizableClassic => "resizable_classic",
            Self::ResizableModern => "resizable_modern",
            Self::Unknown => "unknown",
        })
    }
}
