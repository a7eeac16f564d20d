/// 交错顶点定义模块
///
/// 装配结果按属性分开存储（位置、UV、法线各一个数组）。上传到 GPU 时通常需要
/// 交错布局，`Vertex` 提供这种布局。

use bytemuck::{Pod, Zeroable};

/// 交错的顶点结构
///
/// 内存布局与GPU兼容，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)
/// - normal: 12 bytes (3 * f32)
/// - texcoord: 8 bytes (2 * f32)
/// - tangent: 16 bytes (4 * f32，w 为手性符号)
/// - **总计**: 48 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],

    /// 纹理坐标 (u, v)
    pub texcoord: [f32; 2],

    /// 切线向量 (tx, ty, tz, handedness)
    pub tangent: [f32; 4],
}

impl Vertex {
    #[inline]
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        texcoord: [f32; 2],
        tangent: [f32; 4],
    ) -> Self {
        Self {
            position,
            normal,
            texcoord,
            tangent,
        }
    }

    /// 把顶点切片视为字节，用于缓冲上传
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        // 3*4 + 3*4 + 2*4 + 4*4 = 48 bytes
        assert_eq!(size_of::<Vertex>(), 48);
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn test_vertex_bytes() {
        let vertices = [Vertex::default(), Vertex::new([1.0; 3], [0.0; 3], [0.5; 2], [1.0, 0.0, 0.0, -1.0])];
        let bytes = Vertex::as_bytes(&vertices);

        assert_eq!(bytes.len(), 96);
        assert_eq!(&bytes[48..52], &1.0f32.to_ne_bytes());
    }
}
