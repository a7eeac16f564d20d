/// 几何累积缓冲模块
///
/// `GeometryBuffer` 按顺序接收解析器产生的推送事件，把面组织成
/// buffer → objects → groups → faces 的层次结构，并维护三个全局共享的顶点池。
///
/// # 生命周期
///
/// 缓冲只在累积阶段被修改（单线程、严格按事件顺序）。事件流结束后，
/// 装配阶段只读取它，不再修改顶点池。
///
/// # 当前对象 / 当前组
///
/// 任何时刻都恰好有一个当前对象和一个当前组，用索引表示而不是引用。
/// 第一个对象隐式创建，名为 "default"，带一个同名的隐式组。
use super::face::FaceIndex;
use crate::core::error::{Attribute, GeometryError};
use crate::math::{Vector2, Vector3};

/// 隐式对象和占位组的名字
pub const DEFAULT_NAME: &str = "default";

/// 解析器到累积器的推送事件
///
/// 只接受这七种事件，事件顺序有语义：它决定索引顺序、当前对象/组，以及去重的首见顺序。
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryEvent {
    Object(String),
    Group(Option<String>),
    Material(String),
    Position(Vector3),
    TexCoord(Vector2),
    Normal(Vector3),
    Face(FaceIndex),
}

/// 多边形组
///
/// 每连续3个面索引构成一个三角形。
#[derive(Debug, Clone, PartialEq)]
pub struct GroupData {
    name: String,
    material: Option<String>,
    faces: Vec<FaceIndex>,
}

impl GroupData {
    fn new(name: String, material: Option<String>) -> Self {
        Self {
            name,
            material,
            faces: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 组的材质名（可能从前一个组继承而来）
    pub fn material_name(&self) -> Option<&str> {
        self.material.as_deref()
    }

    pub fn faces(&self) -> &[FaceIndex] {
        &self.faces
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// 没有任何面的组会在被新的组或对象取代时丢弃
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// 命名对象
///
/// 除了按插入顺序保存的组之外，还保存该对象所有面索引的扁平列表（用于去重和装配），
/// 以及带法线索引的角点数量。
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    name: String,
    groups: Vec<GroupData>,
    all_faces: Vec<FaceIndex>,
    normal_count: usize,
}

impl ObjectData {
    fn new(name: String) -> Self {
        Self {
            name,
            groups: Vec::new(),
            all_faces: Vec::new(),
            normal_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[GroupData] {
        &self.groups
    }

    /// 推送到任意组的所有面索引，按推送顺序
    pub fn faces(&self) -> &[FaceIndex] {
        &self.all_faces
    }

    /// 带法线索引的角点数量
    pub fn normal_count(&self) -> usize {
        self.normal_count
    }

    /// 没有任何面的对象会在推送新对象时被移除
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all_faces.is_empty()
    }
}

/// 几何累积缓冲
///
/// # 示例
///
/// ```rust
/// use mesh_assembly::geometry::{FaceIndex, GeometryBuffer};
/// use mesh_assembly::math::Vector3;
///
/// let mut buffer = GeometryBuffer::new();
/// buffer.push_object("cube");
/// buffer.push_position(Vector3::new(0.0, 0.0, 0.0));
/// buffer.push_position(Vector3::new(1.0, 0.0, 0.0));
/// buffer.push_position(Vector3::new(0.0, 1.0, 0.0));
/// for i in 0..3 {
///     buffer.push_face(FaceIndex::position_only(i))?;
/// }
///
/// // 空的 "default" 对象已经被移除
/// assert_eq!(buffer.object_count(), 1);
/// assert_eq!(buffer.objects()[0].name(), "cube");
/// # Ok::<(), mesh_assembly::core::GeometryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeometryBuffer {
    positions: Vec<Vector3>,
    texcoords: Vec<Vector2>,
    normals: Vec<Vector3>,
    objects: Vec<ObjectData>,
    current_object: usize,
    current_group: usize,
    /// 未命名组的编号（"Unnamed-N"），从 1 开始，永不复用
    unnamed_group_index: u32,
}

impl GeometryBuffer {
    /// 创建一个带隐式 "default" 对象和 "default" 组的缓冲
    pub fn new() -> Self {
        let mut object = ObjectData::new(DEFAULT_NAME.to_string());
        object.groups.push(GroupData::new(DEFAULT_NAME.to_string(), None));

        Self {
            positions: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            objects: vec![object],
            current_object: 0,
            current_group: 0,
            unnamed_group_index: 1,
        }
    }

    /// 依次应用整个事件流
    ///
    /// 遇到第一个无效的面索引立即停止。
    pub fn from_events<I>(events: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = GeometryEvent>,
    {
        let mut buffer = Self::new();
        for event in events {
            buffer.apply(event)?;
        }
        Ok(buffer)
    }

    /// 应用单个推送事件
    pub fn apply(&mut self, event: GeometryEvent) -> Result<(), GeometryError> {
        match event {
            GeometryEvent::Object(name) => self.push_object(&name),
            GeometryEvent::Group(name) => self.push_group(name.as_deref()),
            GeometryEvent::Material(name) => self.push_material(&name),
            GeometryEvent::Position(v) => self.push_position(v),
            GeometryEvent::TexCoord(v) => self.push_texcoord(v),
            GeometryEvent::Normal(v) => self.push_normal(v),
            GeometryEvent::Face(face) => return self.push_face(face),
        }
        Ok(())
    }

    /// 开始一个新对象
    ///
    /// 当前对象没有任何面时先将其移除。新对象带一个 "default" 组，
    /// 材质继承自之前的当前组（材质状态跨对象延续）。
    pub fn push_object(&mut self, name: &str) {
        let material = self.current_group().material.clone();

        if self.current_object().is_empty() {
            self.objects.remove(self.current_object);
        }

        let mut object = ObjectData::new(name.to_string());
        object.groups.push(GroupData::new(DEFAULT_NAME.to_string(), material));
        self.objects.push(object);

        self.current_object = self.objects.len() - 1;
        self.current_group = 0;
    }

    /// 在当前对象中开始一个新组
    ///
    /// 当前组为空时先将其丢弃。`name` 为 `None` 时生成 "Unnamed-N"，编号递增；
    /// 命名的组不消耗编号。新组的材质继承自之前的当前组。
    pub fn push_group(&mut self, name: Option<&str>) {
        let material = self.current_group().material.clone();

        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let name = format!("Unnamed-{}", self.unnamed_group_index);
                self.unnamed_group_index += 1;
                name
            }
        };

        let object = &mut self.objects[self.current_object];
        if object.groups[self.current_group].is_empty() {
            object.groups.remove(self.current_group);
        }

        object.groups.push(GroupData::new(name, material));
        self.current_group = object.groups.len() - 1;
    }

    /// 设置当前材质
    ///
    /// 已有面的组不能再改材质：当前组非空时先以材质名开一个新组。
    /// 当前组仍叫占位名 "default" 时改名为材质名。
    pub fn push_material(&mut self, name: &str) {
        if !self.current_group().is_empty() {
            self.push_group(Some(name));
        }

        let group = self.current_group_mut();
        if group.name == DEFAULT_NAME {
            group.name = name.to_string();
        }
        group.material = Some(name.to_string());
    }

    pub fn push_position(&mut self, v: Vector3) {
        self.positions.push(v);
    }

    pub fn push_texcoord(&mut self, v: Vector2) {
        self.texcoords.push(v);
    }

    pub fn push_normal(&mut self, v: Vector3) {
        self.normals.push(v);
    }

    /// 向当前组和当前对象追加一个面角点
    ///
    /// # 错误
    ///
    /// 任何一个存在的索引超出对应顶点池时返回 [`GeometryError::IndexOutOfRange`]，
    /// 缓冲保持不变。
    pub fn push_face(&mut self, face: FaceIndex) -> Result<(), GeometryError> {
        self.validate_face(&face)?;

        self.current_group_mut().faces.push(face);

        let object = &mut self.objects[self.current_object];
        object.all_faces.push(face);
        if face.has_normal() {
            object.normal_count += 1;
        }

        Ok(())
    }

    fn validate_face(&self, face: &FaceIndex) -> Result<(), GeometryError> {
        check_index(Attribute::Position, Some(face.position), self.positions.len())?;
        check_index(Attribute::TexCoord, face.texcoord, self.texcoords.len())?;
        check_index(Attribute::Normal, face.normal, self.normals.len())
    }

    /// 输出缓冲的统计信息（对象、顶点池、每个组的面数）
    pub fn log_summary(&self) {
        crate::geometry_info!("缓冲包含 {} 个对象", self.objects.len());
        crate::geometry_info!("缓冲包含 {} 个顶点位置", self.positions.len());
        crate::geometry_info!("缓冲包含 {} 个纹理坐标", self.texcoords.len());
        crate::geometry_info!("缓冲包含 {} 个法线", self.normals.len());

        for object in &self.objects {
            crate::geometry_info!("{} 包含 {} 个组", object.name, object.groups.len());
            for group in &object.groups {
                crate::geometry_info!(
                    "{}/{} 包含 {} 个面索引",
                    object.name,
                    group.name,
                    group.faces.len()
                );
            }
        }
    }

    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    pub fn texcoords(&self) -> &[Vector2] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    pub fn objects(&self) -> &[ObjectData] {
        &self.objects
    }

    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// 是否还没有推送任何顶点位置
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn current_object(&self) -> &ObjectData {
        &self.objects[self.current_object]
    }

    pub fn current_group(&self) -> &GroupData {
        &self.objects[self.current_object].groups[self.current_group]
    }

    fn current_group_mut(&mut self) -> &mut GroupData {
        &mut self.objects[self.current_object].groups[self.current_group]
    }
}

impl Default for GeometryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_index(attribute: Attribute, index: Option<u32>, len: usize) -> Result<(), GeometryError> {
    match index {
        Some(index) if index as usize >= len => Err(GeometryError::IndexOutOfRange {
            attribute,
            index,
            len,
        }),
        _ => Ok(()),
    }
}
