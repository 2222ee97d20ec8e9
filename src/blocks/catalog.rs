//! Static catalog of executable block kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six executable block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Advance horizontally by `steps`.
    Move,
    /// Rotate by `degrees`.
    Turn,
    /// Jump to absolute `x`, `y`.
    GoTo,
    /// Re-run the list's non-repeat blocks `times` times.
    Repeat,
    /// Show a speech bubble for `time` milliseconds.
    Speak,
    /// Show a thought bubble for `time` milliseconds.
    Think,
}

impl BlockKind {
    /// Catalog entry describing this kind.
    pub fn block_type(self) -> &'static BlockType {
        match self {
            BlockKind::Move => &CATALOG[0],
            BlockKind::Turn => &CATALOG[1],
            BlockKind::GoTo => &CATALOG[2],
            BlockKind::Repeat => &CATALOG[3],
            BlockKind::Speak => &CATALOG[4],
            BlockKind::Think => &CATALOG[5],
        }
    }

    /// Wire name of the kind (`move`, `goTo`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Move => "move",
            BlockKind::Turn => "turn",
            BlockKind::GoTo => "goTo",
            BlockKind::Repeat => "repeat",
            BlockKind::Speak => "speak",
            BlockKind::Think => "think",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Palette grouping of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Position and orientation blocks, plus `repeat`.
    Motion,
    /// Message bubbles.
    Looks,
}

/// Immutable catalog entry for one block kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockType {
    /// Kind this entry describes.
    pub kind: BlockKind,
    /// Human-readable palette label.
    pub label: &'static str,
    /// Ordered parameter names the block accepts.
    pub parameter_names: &'static [&'static str],
    /// Whether the block is a container (only `repeat`).
    pub is_container: bool,
    /// Palette grouping.
    pub category: Category,
}

impl BlockType {
    /// Palette rendering with parameter placeholders, e.g. `Go to __x__ __y__`.
    pub fn template(&self) -> String {
        let mut out = self.label.to_string();
        for name in self.parameter_names {
            out.push_str(&format!(" __{}__", name));
        }
        out
    }
}

static CATALOG: [BlockType; 6] = [
    BlockType {
        kind: BlockKind::Move,
        label: "Move",
        parameter_names: &["steps"],
        is_container: false,
        category: Category::Motion,
    },
    BlockType {
        kind: BlockKind::Turn,
        label: "Turn",
        parameter_names: &["degrees"],
        is_container: false,
        category: Category::Motion,
    },
    BlockType {
        kind: BlockKind::GoTo,
        label: "Go to",
        parameter_names: &["x", "y"],
        is_container: false,
        category: Category::Motion,
    },
    BlockType {
        kind: BlockKind::Repeat,
        label: "Repeat",
        parameter_names: &["times"],
        is_container: true,
        category: Category::Motion,
    },
    BlockType {
        kind: BlockKind::Speak,
        label: "Speak",
        parameter_names: &["text", "time"],
        is_container: false,
        category: Category::Looks,
    },
    BlockType {
        kind: BlockKind::Think,
        label: "Think",
        parameter_names: &["text", "time"],
        is_container: false,
        category: Category::Looks,
    },
];

/// The full block catalog in palette order.
pub fn catalog() -> &'static [BlockType] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup_matches_kind() {
        for entry in catalog() {
            assert_eq!(entry.kind.block_type(), entry);
        }
    }

    #[test]
    fn test_only_repeat_is_container() {
        let containers: Vec<_> = catalog()
            .iter()
            .filter(|entry| entry.is_container)
            .map(|entry| entry.kind)
            .collect();
        assert_eq!(containers, vec![BlockKind::Repeat]);
    }

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&BlockKind::GoTo).unwrap();
        assert_eq!(json, "\"goTo\"");
        let kind: BlockKind = serde_json::from_str("\"think\"").unwrap();
        assert_eq!(kind, BlockKind::Think);
        assert!(serde_json::from_str::<BlockKind>("\"jump\"").is_err());
    }

    #[test]
    fn test_template() {
        assert_eq!(BlockKind::GoTo.block_type().template(), "Go to __x__ __y__");
    }
}
