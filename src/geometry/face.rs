/// 面顶点索引定义模块
///
/// 一个多边形角点对三个顶点池的引用。

/// 面角点的索引三元组 (position, texcoord, normal)
///
/// 位置索引总是存在；纹理坐标和法线索引是可选的，缺失按角点逐个记录。
/// 三元组直接作为去重的哈希键：三个分量（包括"缺失"）全部相等才视为同一个顶点。
///
/// # 示例
///
/// ```rust
/// use mesh_assembly::geometry::FaceIndex;
///
/// let a = FaceIndex::new(0, Some(0), None);
/// let b = FaceIndex::position_only(0).with_texcoord(0);
/// assert_eq!(a, b);
/// assert_ne!(a, a.with_normal(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceIndex {
    /// 位置索引（0 起）
    pub position: u32,

    /// 纹理坐标索引
    pub texcoord: Option<u32>,

    /// 法线索引
    pub normal: Option<u32>,
}

impl FaceIndex {
    #[inline]
    pub fn new(position: u32, texcoord: Option<u32>, normal: Option<u32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// 只有位置索引的角点
    #[inline]
    pub fn position_only(position: u32) -> Self {
        Self::new(position, None, None)
    }

    #[inline]
    pub fn with_texcoord(self, texcoord: u32) -> Self {
        Self {
            texcoord: Some(texcoord),
            ..self
        }
    }

    #[inline]
    pub fn with_normal(self, normal: u32) -> Self {
        Self {
            normal: Some(normal),
            ..self
        }
    }

    /// 该角点是否带有法线索引
    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_absent_components_take_part_in_equality() {
        let mut keys = HashSet::new();
        keys.insert(FaceIndex::new(1, None, None));
        keys.insert(FaceIndex::new(1, Some(0), None));
        keys.insert(FaceIndex::new(1, None, Some(0)));
        keys.insert(FaceIndex::new(1, Some(0), Some(0)));
        keys.insert(FaceIndex::new(1, Some(0), Some(0)));

        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_has_normal() {
        assert!(!FaceIndex::position_only(3).has_normal());
        assert!(FaceIndex::position_only(3).with_normal(2).has_normal());
    }
}
