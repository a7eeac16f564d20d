/// 网格数据结构模块
///
/// 定义装配结果的数据容器：按属性分开的顶点数组、三角形索引，以及按材质组划分的子网格。
/// 这是一个普通的数据传输结构，不依赖任何具体的渲染器。

use super::vertex::Vertex;
use crate::core::error::TangentError;
use crate::math::{geometry, Vector2, Vector3, Vector4};

/// 子网格描述符
///
/// 描述索引数组中属于同一个组（同一个材质）的一段索引。
/// 范围以索引为单位，组的角点数不是3的倍数时也不会错位。
///
/// # 示例
///
/// ```rust
/// use mesh_assembly::geometry::Subset;
///
/// // 从第30个索引开始的60个索引（20个三角形）
/// let subset = Subset::new(1, "wall", "brick", 30, 60);
/// assert_eq!(subset.index_range(), 30..90);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    /// 子网格ID（与组的顺序一致）
    pub id: u32,

    /// 来源组的名字
    pub name: String,

    /// 解析后的材质名（组没有材质时为默认材质名）
    pub material_name: String,

    /// 起始索引位置
    pub index_start: u32,

    /// 索引数量（等于组的角点数）
    pub index_count: u32,
}

impl Subset {
    /// 创建一个新的子网格描述符
    #[inline]
    pub fn new(
        id: u32,
        name: impl Into<String>,
        material_name: impl Into<String>,
        index_start: u32,
        index_count: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            material_name: material_name.into(),
            index_start,
            index_count,
        }
    }

    /// 在索引数组中的范围
    #[inline]
    pub fn index_range(&self) -> std::ops::Range<usize> {
        let start = self.index_start as usize;
        start..start + self.index_count as usize
    }
}

/// 装配后的网格数据
///
/// # 架构说明
///
/// - 单组对象：`subsets` 为空，`indices` 就是唯一的三角形列表
/// - 多组对象：每个组一个 `Subset`，按组顺序排列，`indices` 是各子网格索引的拼接
///
/// 所有子网格共享同一组顶点数组。
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// 网格名称
    pub name: Option<String>,

    /// 顶点位置
    pub positions: Vec<Vector3>,

    /// 纹理坐标（缓冲中没有任何纹理坐标时为 `None`）
    pub texcoords: Option<Vec<Vector2>>,

    /// 法线（对象没有任何法线时为 `None`，需要调用方从几何重建）
    pub normals: Option<Vec<Vector3>>,

    /// 三角形顶点索引，每3个索引定义一个三角形，保持原始绕序
    pub indices: Vec<u32>,

    /// 子网格列表，单组对象时为空
    pub subsets: Vec<Subset>,

    /// 切线（xyz + 手性 w），计算成功后才有
    pub tangents: Option<Vec<Vector4>>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self {
            name: None,
            positions: Vec::new(),
            texcoords: None,
            normals: None,
            indices: Vec::new(),
            subsets: Vec::new(),
            tangents: None,
        }
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 是否按组拆分成了多个子网格
    #[inline]
    pub fn is_split(&self) -> bool {
        !self.subsets.is_empty()
    }

    /// 子网格数量（单组对象为 1）
    pub fn submesh_count(&self) -> usize {
        self.subsets.len().max(1)
    }

    /// 获取第 `index` 个子网格的三角形索引
    ///
    /// 单组对象只有第 0 个子网格，即整个索引数组。
    pub fn submesh_indices(&self, index: usize) -> Option<&[u32]> {
        if self.subsets.is_empty() {
            return (index == 0).then_some(self.indices.as_slice());
        }

        let subset = self.subsets.get(index)?;
        self.indices.get(subset.index_range())
    }

    /// 是否需要调用方从几何重新计算法线
    #[inline]
    pub fn needs_normals(&self) -> bool {
        self.normals.is_none()
    }

    /// 从三角形面重建法线，替换现有法线
    pub fn recalculate_normals(&mut self) {
        self.normals = Some(geometry::reconstruct_normals(&self.positions, &self.indices));
    }

    /// 在整个网格（所有子网格合并）上计算切线空间
    ///
    /// 失败时 `tangents` 保持不变。
    pub fn compute_tangents(&mut self) -> Result<(), TangentError> {
        let tangents = geometry::compute_tangents(
            &self.positions,
            self.normals.as_deref().unwrap_or(&[]),
            self.texcoords.as_deref().unwrap_or(&[]),
            &self.indices,
        )?;

        self.tangents = Some(tangents);
        Ok(())
    }

    /// 生成交错布局的顶点数组
    ///
    /// 缺失的属性填零，缺失的切线填 (1, 0, 0, 1)。
    pub fn to_vertices(&self) -> Vec<Vertex> {
        (0..self.vertex_count())
            .map(|i| {
                let position = self.positions[i];
                let normal = attribute_at(&self.normals, i).unwrap_or_else(Vector3::zeros);
                let texcoord = attribute_at(&self.texcoords, i).unwrap_or_else(Vector2::zeros);
                let tangent =
                    attribute_at(&self.tangents, i).unwrap_or_else(|| Vector4::new(1.0, 0.0, 0.0, 1.0));

                Vertex::new(position.into(), normal.into(), texcoord.into(), tangent.into())
            })
            .collect()
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是3的倍数（每个三角形3个顶点）
    /// - 所有索引都在有效范围内
    /// - 属性数组与顶点数一致
    /// - 子网格描述符的范围有效
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count must be a multiple of 3, got {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertex_count();
        for (i, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(format!(
                    "index {} at position {} out of vertex range ({} vertices)",
                    index, i, vertex_count
                ));
            }
        }

        if let Some(texcoords) = &self.texcoords {
            if texcoords.len() != vertex_count {
                return Err(format!(
                    "texcoord count {} does not match vertex count {}",
                    texcoords.len(),
                    vertex_count
                ));
            }
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(format!(
                    "normal count {} does not match vertex count {}",
                    normals.len(),
                    vertex_count
                ));
            }
        }

        for (i, subset) in self.subsets.iter().enumerate() {
            if subset.index_range().end > self.indices.len() {
                return Err(format!(
                    "subset {} index range out of bounds: start={}, count={}, total={}",
                    i,
                    subset.index_start,
                    subset.index_count,
                    self.indices.len()
                ));
            }
        }

        Ok(())
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute_at<T: Copy>(values: &Option<Vec<T>>, index: usize) -> Option<T> {
    values.as_ref().and_then(|v| v.get(index)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::utils::approx_eq;

    fn triangle_mesh() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    #[test]
    fn test_subset_index_helpers() {
        let subset = Subset::new(0, "g", "m", 30, 60);

        assert_eq!(subset.index_range(), 30..90);

        // 角点数不是3的倍数
        let partial = Subset::new(1, "g", "m", 4, 4);
        assert_eq!(partial.index_range(), 4..8);
    }

    #[test]
    fn test_mesh_data_creation() {
        let mesh = MeshData::new();

        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.name.is_none());
        assert!(mesh.needs_normals());
        assert_eq!(MeshData::with_name("TestMesh").name.as_deref(), Some("TestMesh"));
    }

    #[test]
    fn test_submesh_indices() {
        let mut mesh = triangle_mesh();
        assert_eq!(mesh.submesh_count(), 1);
        assert_eq!(mesh.submesh_indices(0), Some(&[0u32, 1, 2][..]));
        assert_eq!(mesh.submesh_indices(1), None);

        mesh.indices = vec![0, 1, 2, 2, 1, 0];
        mesh.subsets = vec![Subset::new(0, "a", "ma", 0, 3), Subset::new(1, "b", "mb", 3, 3)];
        assert!(mesh.is_split());
        assert_eq!(mesh.submesh_count(), 2);
        assert_eq!(mesh.submesh_indices(1), Some(&[2u32, 1, 0][..]));
    }

    #[test]
    fn test_mesh_data_validation_valid() {
        assert!(triangle_mesh().validate().is_ok());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_count() {
        let mut mesh = triangle_mesh();
        mesh.indices = vec![0, 1];

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_range() {
        let mut mesh = triangle_mesh();
        mesh.indices = vec![0, 1, 5];

        let result = mesh.validate();
        assert!(result.unwrap_err().contains("out of vertex range"));
    }

    #[test]
    fn test_mesh_data_validation_invalid_subset() {
        let mut mesh = triangle_mesh();
        mesh.subsets = vec![Subset::new(0, "a", "m", 0, 6)];

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_recalculate_normals_and_tangents() {
        let mut mesh = triangle_mesh();
        assert_eq!(mesh.compute_tangents(), Err(TangentError::MissingTexcoords));

        mesh.texcoords = Some(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]);
        assert_eq!(mesh.compute_tangents(), Err(TangentError::MissingNormals));
        assert!(mesh.tangents.is_none());

        mesh.recalculate_normals();
        assert!(!mesh.needs_normals());
        mesh.compute_tangents().unwrap();

        let tangents = mesh.tangents.as_ref().unwrap();
        assert_eq!(tangents.len(), 3);
        assert!(approx_eq(tangents[0].x, 1.0, 1e-5));
    }

    #[test]
    fn test_to_vertices() {
        let mut mesh = triangle_mesh();
        mesh.normals = Some(vec![Vector3::z(); 3]);

        let vertices = mesh.to_vertices();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].texcoord, [0.0, 0.0]);
        assert_eq!(vertices[1].tangent, [1.0, 0.0, 0.0, 1.0]);
    }
}
