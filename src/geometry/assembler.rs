/// 网格装配模块
///
/// 读取累积完成的 `GeometryBuffer`，为每个对象生成最终的网格数据：
/// 去重后的顶点数组，以及一个三角形列表（单组）或每组一个子网格（多组）。
///
/// # 流程
///
/// ```text
/// GeometryBuffer (只读)
///     ↓
/// VertexIndexMap (每个对象一次)
///     ↓
/// 顶点数组 + 三角形索引 + 子网格 + 材质槽
///     ↓
/// (可选) 切线空间
///     ↓
/// AssembledMesh → MeshTarget
/// ```
///
/// 对象之间没有共享的可变状态；单个对象的映射构建和数组填充完成后结果才有效。
use super::buffer::{GeometryBuffer, ObjectData, DEFAULT_NAME};
use super::dedup::VertexIndexMap;
use super::material::{MaterialLibrary, MaterialSlot};
use super::mesh::{MeshData, Subset};
use crate::core::config::AssemblyConfig;
use crate::core::error::AssemblyError;
use crate::math::{Vector2, Vector3};

/// 单个对象的装配结果
///
/// 名为 "default" 的对象不设置 `mesh.name`，与隐式创建的默认对象无法区分。
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledMesh<H> {
    /// 几何数据
    pub mesh: MeshData,

    /// 每个子网格一个材质槽（单组对象只有一个）
    pub materials: Vec<MaterialSlot<H>>,
}

impl<H> AssembledMesh<H> {
    /// 第 `index` 个子网格绑定的材质句柄
    pub fn submesh_material(&self, index: usize) -> Option<&H> {
        self.materials.get(index)?.handle.as_ref()
    }
}

/// 网格目标 trait
///
/// 外部渲染资源的抽象：每个目标接收一个对象的装配结果。
pub trait MeshTarget<H> {
    fn receive(&mut self, mesh: AssembledMesh<H>);
}

impl<H> MeshTarget<H> for Option<AssembledMesh<H>> {
    fn receive(&mut self, mesh: AssembledMesh<H>) {
        *self = Some(mesh);
    }
}

/// 装配选项
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOptions {
    /// 组没有材质时使用的材质名
    pub default_material: String,

    /// 缺少法线的对象是否立即从几何重建
    ///
    /// 关闭时只通过 [`MeshData::needs_normals`] 通知调用方。
    pub recalculate_normals: bool,

    /// 是否在装配后计算切线空间
    pub compute_tangents: bool,

    /// 顶点数超过该值时记录警告
    pub max_vertices_per_mesh: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            default_material: DEFAULT_NAME.to_string(),
            recalculate_normals: false,
            compute_tangents: false,
            max_vertices_per_mesh: 649_990,
        }
    }
}

impl From<&AssemblyConfig> for AssemblyOptions {
    fn from(config: &AssemblyConfig) -> Self {
        Self {
            default_material: config.default_material.clone(),
            recalculate_normals: config.recalculate_normals,
            compute_tangents: config.compute_tangents,
            max_vertices_per_mesh: config.max_vertices_per_mesh,
        }
    }
}

/// 网格装配器
///
/// # 示例
///
/// ```rust
/// use std::collections::HashMap;
/// use mesh_assembly::geometry::{FaceIndex, GeometryBuffer, MeshAssembler};
/// use mesh_assembly::math::Vector3;
///
/// let mut buffer = GeometryBuffer::new();
/// buffer.push_position(Vector3::new(0.0, 0.0, 0.0));
/// buffer.push_position(Vector3::new(1.0, 0.0, 0.0));
/// buffer.push_position(Vector3::new(0.0, 1.0, 0.0));
/// for i in 0..3 {
///     buffer.push_face(FaceIndex::position_only(i))?;
/// }
///
/// let materials: HashMap<String, u32> = HashMap::new();
/// let meshes = MeshAssembler::default().assemble_all(&buffer, &materials);
///
/// assert_eq!(meshes[0].mesh.indices, vec![0, 1, 2]);
/// assert!(meshes[0].mesh.needs_normals());
/// # Ok::<(), mesh_assembly::core::GeometryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshAssembler {
    options: AssemblyOptions,
}

impl MeshAssembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &AssemblyConfig) -> Self {
        Self::new(AssemblyOptions::from(config))
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// 装配缓冲中的所有对象，顺序与对象顺序一致
    pub fn assemble_all<M: MaterialLibrary>(
        &self,
        buffer: &GeometryBuffer,
        materials: &M,
    ) -> Vec<AssembledMesh<M::Handle>> {
        buffer
            .objects()
            .iter()
            .map(|object| self.assemble(buffer, object, materials))
            .collect()
    }

    /// 装配第 `index` 个对象
    pub fn assemble_object<M: MaterialLibrary>(
        &self,
        buffer: &GeometryBuffer,
        index: usize,
        materials: &M,
    ) -> Result<AssembledMesh<M::Handle>, AssemblyError> {
        let object = buffer
            .objects()
            .get(index)
            .ok_or(AssemblyError::ObjectOutOfRange {
                index,
                count: buffer.object_count(),
            })?;

        Ok(self.assemble(buffer, object, materials))
    }

    /// 把每个对象的装配结果写入一一对应的网格目标
    ///
    /// # 错误
    ///
    /// 目标数量与对象数量不一致时返回 [`AssemblyError::TargetCountMismatch`]，
    /// 不写入任何目标。
    pub fn populate_meshes<M, T>(
        &self,
        buffer: &GeometryBuffer,
        targets: &mut [T],
        materials: &M,
    ) -> Result<(), AssemblyError>
    where
        M: MaterialLibrary,
        T: MeshTarget<M::Handle>,
    {
        if targets.len() != buffer.object_count() {
            return Err(AssemblyError::TargetCountMismatch {
                objects: buffer.object_count(),
                targets: targets.len(),
            });
        }

        crate::geometry_info!("填充 {} 个网格目标", targets.len());

        for (object, target) in buffer.objects().iter().zip(targets.iter_mut()) {
            target.receive(self.assemble(buffer, object, materials));
        }

        Ok(())
    }

    fn assemble<M: MaterialLibrary>(
        &self,
        buffer: &GeometryBuffer,
        object: &ObjectData,
        materials: &M,
    ) -> AssembledMesh<M::Handle> {
        let span = crate::span_trace!("assemble_object");
        let _guard = span.enter();

        crate::geometry_info!("装配对象: {}", object.name());

        let vertex_map = VertexIndexMap::build(object.faces());
        if vertex_map.len() > self.options.max_vertices_per_mesh {
            crate::geometry_warn!(
                "对象 {} 的顶点数 {} 超过单个网格上限 {}",
                object.name(),
                vertex_map.len(),
                self.options.max_vertices_per_mesh
            );
        }

        let mut mesh = if object.name() == DEFAULT_NAME {
            MeshData::new()
        } else {
            MeshData::with_name(object.name())
        };

        fill_vertex_arrays(&mut mesh, buffer, object, &vertex_map);
        let slots = self.fill_triangles(&mut mesh, object, &vertex_map, materials);

        if mesh.needs_normals() {
            if self.options.recalculate_normals {
                crate::geometry_debug!("对象 {} 缺少法线数据，正在重建...", object.name());
                mesh.recalculate_normals();
            } else {
                crate::geometry_debug!("对象 {} 缺少法线数据，需要由调用方重建", object.name());
            }
        }

        if self.options.compute_tangents {
            if let Err(e) = mesh.compute_tangents() {
                crate::geometry_warn!("无法计算对象 {} 的切线空间 - {}", object.name(), e);
            }
        }

        crate::geometry_info!(
            "对象 {}: {} 个顶点, {} 个三角形, {} 个子网格",
            object.name(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.submesh_count()
        );

        AssembledMesh {
            mesh,
            materials: slots,
        }
    }

    /// 按组顺序写入三角形索引，多组时记录子网格；返回每个子网格的材质槽
    fn fill_triangles<M: MaterialLibrary>(
        &self,
        mesh: &mut MeshData,
        object: &ObjectData,
        vertex_map: &VertexIndexMap,
        materials: &M,
    ) -> Vec<MaterialSlot<M::Handle>> {
        let groups = object.groups();
        let split = groups.len() > 1;

        mesh.indices.reserve(object.faces().len());
        let mut slots = Vec::with_capacity(groups.len());

        if split {
            crate::geometry_debug!("对象 {} 包含 {} 个组", object.name(), groups.len());
        }

        for (id, group) in groups.iter().enumerate() {
            let material_name = group
                .material_name()
                .unwrap_or(&self.options.default_material)
                .to_string();
            let handle = self.resolve_material(&material_name, materials);

            let index_start = mesh.indices.len() as u32;
            mesh.indices.extend(vertex_map.remap(group.faces()));

            if split {
                mesh.subsets.push(Subset::new(
                    id as u32,
                    group.name(),
                    material_name.as_str(),
                    index_start,
                    group.face_count() as u32,
                ));
            }

            slots.push(MaterialSlot {
                name: material_name,
                handle,
            });
        }

        slots
    }

    fn resolve_material<M: MaterialLibrary>(&self, name: &str, materials: &M) -> Option<M::Handle> {
        let handle = materials.lookup(name);
        if handle.is_some() {
            crate::geometry_debug!("材质 {} 已绑定", name);
        } else {
            crate::geometry_warn!("未找到材质: {}", name);
        }
        handle
    }
}

/// 为每个唯一的面索引三元组复制顶点属性
///
/// 缓冲中有任何纹理坐标时输出纹理坐标数组；对象的角点带有法线且缓冲中有法线时输出法线数组。
/// 角点缺失的属性填零。
fn fill_vertex_arrays(
    mesh: &mut MeshData,
    buffer: &GeometryBuffer,
    object: &ObjectData,
    vertex_map: &VertexIndexMap,
) {
    let keys = vertex_map.keys();

    mesh.positions = keys
        .iter()
        .map(|key| buffer.positions()[key.position as usize])
        .collect();

    if buffer.has_texcoords() {
        mesh.texcoords = Some(
            keys.iter()
                .map(|key| {
                    key.texcoord
                        .map(|i| buffer.texcoords()[i as usize])
                        .unwrap_or_else(Vector2::zeros)
                })
                .collect(),
        );
    }

    if buffer.has_normals() && object.normal_count() > 0 {
        mesh.normals = Some(
            keys.iter()
                .map(|key| {
                    key.normal
                        .map(|i| buffer.normals()[i as usize])
                        .unwrap_or_else(Vector3::zeros)
                })
                .collect(),
        );
    }
}
