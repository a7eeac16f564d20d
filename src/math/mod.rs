//! 数学库模块
//!
//! 基于 `nalgebra` 的向量类型别名，以及网格后处理用到的几何函数。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector2/3/4
//! - **常量**：EPSILON
//! - **工具函数**：approx_eq, any_perpendicular
//! - **几何处理**：切线空间计算、法线重建（见 geometry 子模块）

pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;

/// 数学常量
pub mod constants {
    /// 浮点数比较的 epsilon
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::*;

    /// 检查两个浮点数是否近似相等
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    /// 返回一个与 `v` 垂直的单位向量
    ///
    /// 选择与 `v` 最不平行的坐标轴做叉乘。`v` 为零向量时返回 X 轴。
    pub fn any_perpendicular(v: &Vector3) -> Vector3 {
        let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
            Vector3::x()
        } else if v.y.abs() <= v.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };

        let perp = v.cross(&axis);
        let length = perp.norm();
        if length < constants::EPSILON {
            Vector3::x()
        } else {
            perp / length
        }
    }
}

// 几何处理模块（切线、法线）
pub mod geometry;
