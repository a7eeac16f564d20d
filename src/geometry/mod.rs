/// 几何体累积和网格装配模块
///
/// 把按顺序推送的几何事件（对象、组、材质、顶点属性、面）累积成缓冲，
/// 再为每个对象装配去重后的顶点数组、三角形列表或子网格。
///
/// # 模块结构
///
/// - `face`: 面角点索引（位置 / 纹理坐标 / 法线）
/// - `buffer`: 推送式累积缓冲，维护对象和组的层级
/// - `dedup`: 角点去重映射
/// - `vertex`: 交错布局的顶点结构
/// - `mesh`: 装配结果的数据结构和子网格描述符
/// - `material`: 材质库抽象
/// - `assembler`: 网格装配器和网格目标
/// - `loaders`: 各种格式的模型加载器
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ) 或事件流
///     ↓
/// Loader / GeometryEvent
///     ↓
/// GeometryBuffer (累积)
///     ↓
/// MeshAssembler (去重 + 子网格 + 材质 + 切线)
///     ↓
/// MeshTarget
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_assembly::core::config::LoaderConfig;
/// use mesh_assembly::geometry::loaders::load_model;
/// use mesh_assembly::geometry::MeshAssembler;
/// use std::path::Path;
///
/// let model = load_model(Path::new("model.obj"), &LoaderConfig::default())?;
/// let meshes = MeshAssembler::default().assemble_all(&model.buffer, &model.materials);
///
/// for assembled in &meshes {
///     println!("顶点数: {}", assembled.mesh.vertex_count());
///     println!("三角形数: {}", assembled.mesh.triangle_count());
/// }
/// # Ok::<(), mesh_assembly::core::MeshAssemblyError>(())
/// ```

pub mod face;
pub mod buffer;
pub mod dedup;
pub mod vertex;
pub mod mesh;
pub mod material;
pub mod assembler;
pub mod loaders;

// 重新导出常用类型
pub use face::FaceIndex;
pub use buffer::{GeometryBuffer, GeometryEvent, GroupData, ObjectData, DEFAULT_NAME};
pub use dedup::VertexIndexMap;
pub use vertex::Vertex;
pub use mesh::{MeshData, Subset};
pub use material::{MaterialLibrary, MaterialSlot};
pub use assembler::{AssembledMesh, AssemblyOptions, MeshAssembler, MeshTarget};
