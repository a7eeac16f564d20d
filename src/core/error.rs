//! 错误处理模块
//!
//! 定义了网格装配流程中使用的统一错误类型。
//!
//! # 错误分类
//!
//! - **几何错误**：面索引引用了不存在的顶点池元素（在 `push_face` 时立即报告）
//! - **装配错误**：目标数量与对象数量不一致（整个装配过程中止，不写出任何数据）
//! - **切线错误**：切线计算的前置条件不满足（可恢复，仅记录警告）
//! - **加载错误**：外部模型文件读取或解析失败

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, MeshAssemblyError>;

/// 网格装配的顶层错误类型
#[derive(Debug)]
pub enum MeshAssemblyError {
    /// 配置错误
    Config(ConfigError),

    /// 几何数据累积错误
    Geometry(GeometryError),

    /// 网格装配错误
    Assembly(AssemblyError),

    /// 切线空间计算错误
    Tangent(TangentError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 顶点属性种类，用于错误报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

/// 几何累积相关的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// 面索引超出对应顶点池的范围
    IndexOutOfRange {
        attribute: Attribute,
        index: u32,
        len: usize,
    },
}

/// 网格装配相关的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// 网格目标数量与对象数量不一致
    TargetCountMismatch { objects: usize, targets: usize },

    /// 对象索引越界
    ObjectOutOfRange { index: usize, count: usize },
}

/// 切线空间计算的前置条件错误
///
/// 每个变体对应一个可区分的失败原因，出现任何一个都不会产生部分输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TangentError {
    /// 未定义纹理坐标
    MissingTexcoords,

    /// 未定义顶点位置
    MissingPositions,

    /// 未定义法线
    MissingNormals,

    /// 未定义三角形
    MissingTriangles,

    /// 索引数量不是3的倍数
    IncompleteTriangle { len: usize },

    /// 顶点数量不足
    NotEnoughVertices { max_index: u32, count: usize },

    /// 法线数量不足
    NotEnoughNormals { max_index: u32, count: usize },

    /// 纹理坐标数量不足
    NotEnoughTexcoords { max_index: u32, count: usize },
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),
}

impl fmt::Display for MeshAssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshAssemblyError::Config(e) => write!(f, "Configuration error: {}", e),
            MeshAssemblyError::Geometry(e) => write!(f, "Geometry error: {}", e),
            MeshAssemblyError::Assembly(e) => write!(f, "Assembly error: {}", e),
            MeshAssemblyError::Tangent(e) => write!(f, "Tangent error: {}", e),
            MeshAssemblyError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            MeshAssemblyError::Io(e) => write!(f, "IO error: {}", e),
            MeshAssemblyError::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::TexCoord => write!(f, "texcoord"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::IndexOutOfRange { attribute, index, len } => write!(
                f,
                "Face references {} {} but only {} {}(s) were pushed",
                attribute, index, len, attribute
            ),
        }
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::TargetCountMismatch { objects, targets } => write!(
                f,
                "Mesh target count mismatch: {} object(s) accumulated, {} target(s) supplied",
                objects, targets
            ),
            AssemblyError::ObjectOutOfRange { index, count } => {
                write!(f, "Object index {} out of range (count {})", index, count)
            }
        }
    }
}

impl fmt::Display for TangentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TangentError::MissingTexcoords => write!(f, "texture coordinates not defined"),
            TangentError::MissingPositions => write!(f, "vertices not defined"),
            TangentError::MissingNormals => write!(f, "normals not defined"),
            TangentError::MissingTriangles => write!(f, "triangles not defined"),
            TangentError::IncompleteTriangle { len } => {
                write!(f, "index count {} is not a multiple of 3", len)
            }
            TangentError::NotEnoughVertices { max_index, count } => write!(
                f,
                "not enough vertices: {} (max index {})",
                count, max_index
            ),
            TangentError::NotEnoughNormals { max_index, count } => {
                write!(f, "not enough normals: {} (max index {})", count, max_index)
            }
            TangentError::NotEnoughTexcoords { max_index, count } => {
                write!(f, "not enough UVs: {} (max index {})", count, max_index)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
        }
    }
}

impl std::error::Error for MeshAssemblyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshAssemblyError::Io(e) => Some(e),
            MeshAssemblyError::Config(e) => Some(e),
            MeshAssemblyError::Geometry(e) => Some(e),
            MeshAssemblyError::Assembly(e) => Some(e),
            MeshAssemblyError::Tangent(e) => Some(e),
            MeshAssemblyError::MeshLoading(e) => Some(e),
            MeshAssemblyError::Log(_) => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GeometryError {}
impl std::error::Error for AssemblyError {}
impl std::error::Error for TangentError {}
impl std::error::Error for MeshLoadError {}

impl From<std::io::Error> for MeshAssemblyError {
    fn from(err: std::io::Error) -> Self {
        MeshAssemblyError::Io(err)
    }
}

impl From<ConfigError> for MeshAssemblyError {
    fn from(err: ConfigError) -> Self {
        MeshAssemblyError::Config(err)
    }
}

impl From<GeometryError> for MeshAssemblyError {
    fn from(err: GeometryError) -> Self {
        MeshAssemblyError::Geometry(err)
    }
}

impl From<AssemblyError> for MeshAssemblyError {
    fn from(err: AssemblyError) -> Self {
        MeshAssemblyError::Assembly(err)
    }
}

impl From<TangentError> for MeshAssemblyError {
    fn from(err: TangentError) -> Self {
        MeshAssemblyError::Tangent(err)
    }
}

impl From<MeshLoadError> for MeshAssemblyError {
    fn from(err: MeshLoadError) -> Self {
        MeshAssemblyError::MeshLoading(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_reports_both_counts() {
        let err: MeshAssemblyError = AssemblyError::TargetCountMismatch {
            objects: 3,
            targets: 2,
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("3 object(s)"));
        assert!(msg.contains("2 target(s)"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = GeometryError::IndexOutOfRange {
            attribute: Attribute::Normal,
            index: 7,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Face references normal 7 but only 2 normal(s) were pushed"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err: MeshAssemblyError = TangentError::MissingNormals.into();
        assert!(err.source().is_some());

        let err = MeshAssemblyError::Log("boom".to_string());
        assert!(err.source().is_none());
    }
}
