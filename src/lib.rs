//! MeshAssembly - 几何累积与网格装配库
//!
//! 接收按顺序推送的几何数据（对象、组、材质、顶点属性、面角点），
//! 为每个对象生成可直接上传的网格：去重后的顶点数组、三角形列表或按组拆分的子网格，
//! 以及材质绑定和可选的切线空间。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `math`: 数学类型和切线空间计算
//! - `geometry`: 累积缓冲、去重、装配器和模型加载器
//!
//! # 使用示例
//!
//! ```
//! use std::collections::HashMap;
//! use mesh_assembly::geometry::{GeometryBuffer, GeometryEvent, FaceIndex, MeshAssembler};
//! use mesh_assembly::math::Vector3;
//!
//! let buffer = GeometryBuffer::from_events(vec![
//!     GeometryEvent::Object("tri".to_string()),
//!     GeometryEvent::Position(Vector3::new(0.0, 0.0, 0.0)),
//!     GeometryEvent::Position(Vector3::new(1.0, 0.0, 0.0)),
//!     GeometryEvent::Position(Vector3::new(0.0, 1.0, 0.0)),
//!     GeometryEvent::Face(FaceIndex::position_only(0)),
//!     GeometryEvent::Face(FaceIndex::position_only(1)),
//!     GeometryEvent::Face(FaceIndex::position_only(2)),
//! ])?;
//!
//! let materials: HashMap<String, ()> = HashMap::new();
//! let meshes = MeshAssembler::default().assemble_all(&buffer, &materials);
//! assert_eq!(meshes.len(), 1);
//! assert_eq!(meshes[0].mesh.name.as_deref(), Some("tri"));
//! # Ok::<(), mesh_assembly::core::GeometryError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod math;
