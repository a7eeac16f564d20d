/// 顶点去重模块
///
/// 把一个对象的面索引三元组映射到唯一的输出顶点编号。
/// 编号按首次出现的顺序分配；同一对象内（即使跨组）三元组完全相同的角点共享同一个输出顶点。
use std::collections::HashMap;

use super::face::FaceIndex;

/// 面索引三元组到输出顶点编号的映射
///
/// # 示例
///
/// ```rust
/// use mesh_assembly::geometry::{FaceIndex, VertexIndexMap};
///
/// let faces = [
///     FaceIndex::position_only(0),
///     FaceIndex::position_only(1),
///     FaceIndex::position_only(0),
/// ];
/// let map = VertexIndexMap::build(&faces);
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.remap(&faces), vec![0, 1, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexIndexMap {
    indices: HashMap<FaceIndex, u32>,
    /// 按编号排列的唯一键
    keys: Vec<FaceIndex>,
}

impl VertexIndexMap {
    /// 按首见顺序为所有不同的三元组分配编号
    pub fn build(faces: &[FaceIndex]) -> Self {
        let mut map = Self {
            indices: HashMap::with_capacity(faces.len()),
            keys: Vec::new(),
        };

        for face in faces {
            map.insert(*face);
        }

        map
    }

    /// 插入一个三元组并返回它的编号；已存在时返回原编号
    pub fn insert(&mut self, face: FaceIndex) -> u32 {
        let next = self.keys.len() as u32;
        let index = *self.indices.entry(face).or_insert(next);
        if index == next {
            self.keys.push(face);
        }
        index
    }

    #[inline]
    pub fn index_of(&self, face: &FaceIndex) -> Option<u32> {
        self.indices.get(face).copied()
    }

    /// 不同三元组的数量，即输出顶点数
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 按编号顺序排列的唯一三元组
    pub fn keys(&self) -> &[FaceIndex] {
        &self.keys
    }

    /// 把面索引列表映射为输出顶点编号，保持原顺序（即保持三角形绕序）
    ///
    /// 不在映射中的三元组会被跳过，因此只应传入构建映射时用过的面。
    pub fn remap(&self, faces: &[FaceIndex]) -> Vec<u32> {
        faces.iter().filter_map(|face| self.index_of(face)).collect()
    }
}
