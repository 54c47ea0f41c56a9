//! Control Flow Graph types
//!
//! Blocks are stored densely and addressed by `BlockId`; the entry block is
//! always `BlockId(0)` and the exit block `BlockId(1)`.

use super::operation::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Basic block identity (index into `ControlFlowGraph::blocks`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Block kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Entry,
    Exit,
    Block,
}

/// CFG basic block
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Statement-level operation roots, in execution order
    pub operations: Vec<Operation>,
    pub predecessors: Vec<BlockId>,
    pub successors: Vec<BlockId>,
}

/// Control flow graph of one procedure
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    blocks: Vec<BasicBlock>,
}

impl Default for ControlFlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFlowGraph {
    /// Graph with only the entry and exit blocks
    pub fn new() -> Self {
        let empty = |id, kind| BasicBlock {
            id: BlockId(id),
            kind,
            operations: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        };
        Self {
            blocks: vec![empty(0, BlockKind::Entry), empty(1, BlockKind::Exit)],
        }
    }

    pub fn entry(&self) -> BlockId {
        BlockId(0)
    }

    pub fn exit(&self) -> BlockId {
        BlockId(1)
    }

    pub fn add_block(&mut self, operations: Vec<Operation>) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock {
            id,
            kind: BlockKind::Block,
            operations,
            predecessors: Vec::new(),
            successors: Vec::new(),
        });
        id
    }

    /// Adds `from -> to`; duplicate edges are ignored.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId) {
        if from.index() >= self.blocks.len() || to.index() >= self.blocks.len() {
            return;
        }
        if self.blocks[from.index()].successors.contains(&to) {
            return;
        }
        self.blocks[from.index()].successors.push(to);
        self.blocks[to.index()].predecessors.push(from);
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Reachable blocks in reverse postorder from the entry block
    pub fn reverse_postorder(&self) -> Vec<BlockId> {
        let mut visited = vec![false; self.blocks.len()];
        let mut postorder = Vec::with_capacity(self.blocks.len());
        // (block, next successor index)
        let mut stack: Vec<(BlockId, usize)> = vec![(self.entry(), 0)];
        visited[self.entry().index()] = true;

        while let Some((block, next)) = stack.last_mut() {
            let successors = &self.blocks[block.index()].successors;
            if *next < successors.len() {
                let succ = successors[*next];
                *next += 1;
                if !visited[succ.index()] {
                    visited[succ.index()] = true;
                    stack.push((succ, 0));
                }
            } else {
                postorder.push(*block);
                stack.pop();
            }
        }

        postorder.reverse();
        postorder
    }
}

/// An operation root paired with its CFG, if one was built for it
#[derive(Debug, Clone)]
pub struct OperationBlock {
    pub root: Operation,
    pub cfg: Option<Arc<ControlFlowGraph>>,
}

impl OperationBlock {
    pub fn new(root: Operation, cfg: Option<Arc<ControlFlowGraph>>) -> Self {
        Self { root, cfg }
    }
}
