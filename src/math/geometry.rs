//! 几何数学工具模块
//!
//! 提供网格后处理相关的数学函数：
//! - 切线空间计算（用于法线贴图）
//! - 法线重建（从三角形面计算顶点法线）
//!
//! 两者都只读取装配好的数组，不修改输入。

use super::utils::any_perpendicular;
use super::{constants::EPSILON, Vector2, Vector3, Vector4};
use crate::core::error::TangentError;

/// 计算每个顶点的切线空间向量
///
/// 使用UV坐标导数计算每个顶点的切线，w 分量为手性符号（+1 或 -1）。
///
/// # 算法
///
/// 1. 对于每个三角形 (i1, i2, i3):
///    - 位置边向量: e1 = p2 - p1, e2 = p3 - p1
///    - UV 边向量: d1 = uv2 - uv1, d2 = uv3 - uv1
///    - r = 1.0 / (d1.x * d2.y - d2.x * d1.y)
///    - sdir = (e1 * d2.y - e2 * d1.y) * r，tdir = (e2 * d1.x - e1 * d2.x) * r
///    - 将 sdir、tdir 累加到三个顶点（求和，不取平均）
///
/// 2. 对每个顶点:
///    - Gram-Schmidt: t = normalize(sdir - n * dot(n, sdir))
///    - w = dot(cross(n, t), tdir) < 0 ? -1 : 1
///
/// UV 退化的三角形（行列式为零）不做特殊处理，其顶点的切线会变成非有限值。
///
/// # 错误
///
/// 任何前置条件不满足时返回对应的 [`TangentError`]，不产生部分输出。
///
/// # 示例
///
/// ```rust
/// use mesh_assembly::math::{geometry::compute_tangents, Vector2, Vector3};
///
/// let positions = [
///     Vector3::new(0.0, 0.0, 0.0),
///     Vector3::new(1.0, 0.0, 0.0),
///     Vector3::new(1.0, 1.0, 0.0),
/// ];
/// let normals = [Vector3::z(); 3];
/// let uvs = [
///     Vector2::new(0.0, 0.0),
///     Vector2::new(1.0, 0.0),
///     Vector2::new(1.0, 1.0),
/// ];
///
/// let tangents = compute_tangents(&positions, &normals, &uvs, &[0, 1, 2])?;
/// assert_eq!(tangents.len(), 3);
/// # Ok::<(), mesh_assembly::core::TangentError>(())
/// ```
pub fn compute_tangents(
    positions: &[Vector3],
    normals: &[Vector3],
    texcoords: &[Vector2],
    indices: &[u32],
) -> Result<Vec<Vector4>, TangentError> {
    check_preconditions(positions, normals, texcoords, indices)?;

    let vertex_count = positions.len();
    let mut tan1 = vec![Vector3::zeros(); vertex_count];
    let mut tan2 = vec![Vector3::zeros(); vertex_count];

    for triangle in indices.chunks_exact(3) {
        let i1 = triangle[0] as usize;
        let i2 = triangle[1] as usize;
        let i3 = triangle[2] as usize;

        // 位置空间的边
        let e1 = positions[i2] - positions[i1];
        let e2 = positions[i3] - positions[i1];

        // 纹理空间的边
        let d1 = texcoords[i2] - texcoords[i1];
        let d2 = texcoords[i3] - texcoords[i1];

        let r = 1.0 / (d1.x * d2.y - d2.x * d1.y);
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i1, i2, i3] {
            tan1[i] += sdir;
            tan2[i] += tdir;
        }
    }

    let tangents = (0..vertex_count)
        .map(|i| {
            let normal = normals.get(i).copied().unwrap_or_else(Vector3::zeros);
            finalize_tangent(&normal, &tan1[i], &tan2[i])
        })
        .collect();

    Ok(tangents)
}

/// 按固定顺序检查切线计算的前置条件
fn check_preconditions(
    positions: &[Vector3],
    normals: &[Vector3],
    texcoords: &[Vector2],
    indices: &[u32],
) -> Result<(), TangentError> {
    if texcoords.is_empty() {
        return Err(TangentError::MissingTexcoords);
    }
    if positions.is_empty() {
        return Err(TangentError::MissingPositions);
    }
    if normals.is_empty() {
        return Err(TangentError::MissingNormals);
    }
    if indices.is_empty() {
        return Err(TangentError::MissingTriangles);
    }
    if indices.len() % 3 != 0 {
        return Err(TangentError::IncompleteTriangle { len: indices.len() });
    }

    let max_index = indices.iter().copied().max().unwrap_or(0);
    let needed = max_index as usize;

    if positions.len() <= needed {
        return Err(TangentError::NotEnoughVertices {
            max_index,
            count: positions.len(),
        });
    }
    if normals.len() <= needed {
        return Err(TangentError::NotEnoughNormals {
            max_index,
            count: normals.len(),
        });
    }
    if texcoords.len() <= needed {
        return Err(TangentError::NotEnoughTexcoords {
            max_index,
            count: texcoords.len(),
        });
    }

    Ok(())
}

/// 正交化累加的切线并计算手性
fn finalize_tangent(normal: &Vector3, sdir: &Vector3, tdir: &Vector3) -> Vector4 {
    let n = normalize(*normal);

    // Gram-Schmidt: t = t - n * dot(n, t)
    let orthogonal = sdir - n * n.dot(sdir);
    let length = orthogonal.norm();

    // 没有被任何三角形引用的顶点累加值为零，任取一个垂直方向
    let t = if length < EPSILON {
        any_perpendicular(&n)
    } else {
        orthogonal / length
    };

    let w = if n.cross(&t).dot(tdir) < 0.0 { -1.0 } else { 1.0 };

    Vector4::new(t.x, t.y, t.z, w)
}

/// 从三角形面重建顶点法线
///
/// 遍历所有三角形，将未归一化的面法线（叉乘结果，长度与面积成正比）累加到三个顶点，
/// 最后归一化。对象缺少法线数据时，装配结果会要求调用方执行这一步。
///
/// # 参数
///
/// - `positions`: 顶点位置
/// - `indices`: 索引数组（每3个索引定义一个三角形，必须都在 `positions` 范围内）
pub fn reconstruct_normals(positions: &[Vector3], indices: &[u32]) -> Vec<Vector3> {
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;

        let edge1 = positions[i1] - positions[i0];
        let edge2 = positions[i2] - positions[i0];
        let face_normal = edge1.cross(&edge2);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals.into_iter().map(normalize).collect()
}

/// 归一化3D向量，长度为零时返回零向量
#[inline]
fn normalize(v: Vector3) -> Vector3 {
    let length = v.norm();

    if length < EPSILON {
        Vector3::zeros()
    } else {
        v / length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::utils::approx_eq;

    fn quad() -> (Vec<Vector3>, Vec<Vector3>, Vec<Vector2>, Vec<u32>) {
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let normals = vec![Vector3::z(); 4];
        let uvs = positions.iter().map(|p| Vector2::new(p.x, p.y)).collect();
        (positions, normals, uvs, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_planar_quad_tangents() {
        let (positions, normals, uvs, indices) = quad();
        let tangents = compute_tangents(&positions, &normals, &uvs, &indices).unwrap();

        assert_eq!(tangents.len(), 4);
        for t in &tangents {
            assert!(approx_eq(t.x, 1.0, 1e-5), "切线应指向 +X: {:?}", t);
            assert!(approx_eq(t.y, 0.0, 1e-5));
            assert!(approx_eq(t.z, 0.0, 1e-5));
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn test_mirrored_uvs_flip_handedness() {
        let (positions, normals, _, indices) = quad();
        let uvs: Vec<Vector2> = positions.iter().map(|p| Vector2::new(1.0 - p.x, p.y)).collect();

        let tangents = compute_tangents(&positions, &normals, &uvs, &indices).unwrap();

        for t in &tangents {
            assert!(approx_eq(t.x, -1.0, 1e-5), "切线应指向 -X: {:?}", t);
            assert_eq!(t.w, -1.0);
        }
    }

    #[test]
    fn test_tangents_orthogonal_to_normals() {
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.5, 0.1),
            Vector3::new(0.3, 1.5, 0.7),
            Vector3::new(5.0, 5.0, 5.0), // 不被引用
        ];
        let normals = vec![
            Vector3::new(0.0, 0.2, 1.0),
            Vector3::new(0.1, 0.0, 2.0), // 非单位长度
            Vector3::new(-0.2, 0.1, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let uvs = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.2),
            Vector2::new(0.1, 0.9),
            Vector2::new(0.5, 0.5),
        ];

        let tangents = compute_tangents(&positions, &normals, &uvs, &[0, 1, 2]).unwrap();

        for (t, n) in tangents.iter().zip(&normals) {
            let t3 = Vector3::new(t.x, t.y, t.z);
            let dot_product = t3.dot(&n.normalize());
            assert!(approx_eq(dot_product, 0.0, 1e-5), "切线应该与法线正交: dot = {}", dot_product);
            assert!(approx_eq(t3.norm(), 1.0, 1e-5), "切线应该已归一化: {:?}", t);
            assert!(t.w == 1.0 || t.w == -1.0);
        }
    }

    #[test]
    fn test_degenerate_uv_triangle_is_not_finite() {
        let (positions, normals, _, _) = quad();
        let uvs = vec![Vector2::new(0.5, 0.5); 4];

        let tangents = compute_tangents(&positions, &normals, &uvs, &[0, 1, 2]).unwrap();

        for t in &tangents[..3] {
            assert!(!t.x.is_finite(), "UV 退化的三角形不做修正: {:?}", t);
        }
        // 未被引用的顶点不受影响
        assert!(tangents[3].x.is_finite());
    }

    #[test]
    fn test_missing_inputs() {
        let (positions, normals, uvs, indices) = quad();

        assert_eq!(
            compute_tangents(&positions, &normals, &[], &indices),
            Err(TangentError::MissingTexcoords)
        );
        assert_eq!(
            compute_tangents(&[], &normals, &uvs, &indices),
            Err(TangentError::MissingPositions)
        );
        assert_eq!(
            compute_tangents(&positions, &[], &uvs, &indices),
            Err(TangentError::MissingNormals)
        );
        assert_eq!(
            compute_tangents(&positions, &normals, &uvs, &[]),
            Err(TangentError::MissingTriangles)
        );
        assert_eq!(
            compute_tangents(&positions, &normals, &uvs, &[0, 1]),
            Err(TangentError::IncompleteTriangle { len: 2 })
        );
    }

    #[test]
    fn test_out_of_range_indices() {
        let (positions, normals, uvs, _) = quad();

        assert_eq!(
            compute_tangents(&positions, &normals, &uvs, &[0, 1, 4]),
            Err(TangentError::NotEnoughVertices { max_index: 4, count: 4 })
        );
        assert_eq!(
            compute_tangents(&positions, &normals[..2], &uvs, &[0, 1, 2]),
            Err(TangentError::NotEnoughNormals { max_index: 2, count: 2 })
        );
        assert_eq!(
            compute_tangents(&positions, &normals, &uvs[..1], &[0, 1, 2]),
            Err(TangentError::NotEnoughTexcoords { max_index: 2, count: 1 })
        );
    }

    #[test]
    fn test_reconstruct_normals_simple_triangle() {
        // XZ 平面上的三角形
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];

        let normals = reconstruct_normals(&positions, &[0, 1, 2]);

        // 方向取决于绕序：(1,0,0) x (0,0,1) = (0,-1,0)
        for normal in &normals {
            assert!(approx_eq(normal.y, -1.0, 1e-6), "法线应指向 -Y: {:?}", normal);
            assert!(approx_eq(normal.norm(), 1.0, 1e-6));
        }
    }

    #[test]
    fn test_reconstruct_normals_unreferenced_vertex() {
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(9.0, 9.0, 9.0),
        ];

        let normals = reconstruct_normals(&positions, &[0, 1, 2]);

        assert!(approx_eq(normals[0].z, 1.0, 1e-6));
        assert_eq!(normals[3], Vector3::zeros());
    }
}
