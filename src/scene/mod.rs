//! 场景图模块
//!
//! [`Scene`] 是一个槽位数组（arena），拥有全部 [`GameObject`]。
//! 节点之间、骨骼到节点之间的引用都是 [`GameObjectId`]，不持有所有权；
//! 删除节点时由场景负责级联释放整棵子树。

mod game_object;
mod graph;

pub use game_object::GameObject;
pub use graph::Scene;

use std::fmt;

/// GameObject 句柄
///
/// 由槽位下标和代数组成。节点删除后槽位代数加一，旧句柄随即失效，不会指向复用后的新节点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectId {
    index: u32,
    generation: u32,
}

impl GameObjectId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
