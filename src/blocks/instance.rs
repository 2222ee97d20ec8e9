//! Parameter-bound block instances and the per-sprite action list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::block::Block;
use super::catalog::{BlockKind, BlockType};
use super::value::ParamValue;
use crate::runtime::error::{StageError, StageResult};

/// A block kind bound to the raw parameter values entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    /// Kind of block.
    pub kind: BlockKind,
    /// Raw parameter values keyed by parameter name.
    #[serde(default)]
    pub values: BTreeMap<String, ParamValue>,
}

impl BlockInstance {
    /// Create an instance with no parameter values set.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a parameter value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Raw value for a parameter, if set.
    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Catalog entry for this instance's kind.
    pub fn block_type(&self) -> &'static BlockType {
        self.kind.block_type()
    }

    /// `move(steps)`.
    pub fn move_by(steps: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::Move).with("steps", steps)
    }

    /// `turn(degrees)`.
    pub fn turn_by(degrees: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::Turn).with("degrees", degrees)
    }

    /// `goTo(x, y)`.
    pub fn go_to(x: impl Into<ParamValue>, y: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::GoTo).with("x", x).with("y", y)
    }

    /// `repeat(times)`.
    pub fn repeat(times: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::Repeat).with("times", times)
    }

    /// `speak(text, time)`.
    pub fn speak(text: impl Into<ParamValue>, time: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::Speak).with("text", text).with("time", time)
    }

    /// `think(text, time)`.
    pub fn think(text: impl Into<ParamValue>, time: impl Into<ParamValue>) -> Self {
        Self::new(BlockKind::Think).with("text", text).with("time", time)
    }
}

/// Ordered list of block instances belonging to exactly one sprite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionList {
    blocks: Vec<BlockInstance>,
}

impl ActionList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh, parameterless block of `kind` and return its index.
    pub fn push(&mut self, kind: BlockKind) -> usize {
        self.push_instance(BlockInstance::new(kind))
    }

    /// Append an existing instance and return its index.
    pub fn push_instance(&mut self, block: BlockInstance) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Remove and return the block at `index`.
    pub fn remove(&mut self, index: usize) -> StageResult<BlockInstance> {
        self.check_index(index)?;
        Ok(self.blocks.remove(index))
    }

    /// Set (or overwrite) one parameter value of the block at `index`.
    pub fn set_value(
        &mut self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> StageResult<()> {
        self.check_index(index)?;
        self.blocks[index].values.insert(name.into(), value.into());
        Ok(())
    }

    /// Remove every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Blocks in order.
    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the list holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Normalize every instance into its typed block.
    pub fn compile(&self) -> Vec<Block> {
        self.blocks.iter().map(Block::from_instance).collect()
    }

    fn check_index(&self, index: usize) -> StageResult<()> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(StageError::BlockIndexOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }
}

impl FromIterator<BlockInstance> for ActionList {
    fn from_iter<I: IntoIterator<Item = BlockInstance>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
