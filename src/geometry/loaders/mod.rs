/// 模型加载器模块
///
/// 把外部模型文件转换成推送事件，填充 `GeometryBuffer`。
/// 事件顺序与文件中的记录顺序一致；材质库交给 tobj 解析。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（材质库使用 tobj crate）
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_assembly::core::config::LoaderConfig;
/// use mesh_assembly::geometry::loaders::load_model;
/// use std::path::Path;
///
/// let model = load_model(Path::new("model.obj"), &LoaderConfig::default())?;
/// println!("对象数: {}", model.buffer.object_count());
/// # Ok::<(), mesh_assembly::core::MeshAssemblyError>(())
/// ```
use crate::core::config::LoaderConfig;
use crate::core::error::{MeshAssemblyError, MeshLoadError, Result};
use crate::geometry::buffer::GeometryBuffer;
use std::collections::HashMap;
use std::path::Path;

pub mod obj_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;

/// 加载结果：累积完成的几何缓冲和按名字索引的材质库
#[derive(Debug, Clone)]
pub struct LoadedModel<M> {
    pub buffer: GeometryBuffer,
    pub materials: HashMap<String, M>,
}

/// 模型加载器 trait
///
/// 所有格式的加载器都实现此 trait。
///
/// # 实现要求
///
/// - 加载器应该是无状态的（使用静态方法）
/// - 按文件中的顺序推送事件，不重排
/// - 正确处理错误情况并返回有意义的错误信息
pub trait ModelLoader {
    /// 材质句柄类型
    type Material: Clone;

    /// 从文件路径加载
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    /// - 面引用了不存在的顶点
    fn load_from_file(path: &Path, options: &LoaderConfig) -> Result<LoadedModel<Self::Material>>;

    /// 从内存数据加载
    fn load_from_memory(data: &[u8], options: &LoaderConfig) -> Result<LoadedModel<Self::Material>>;

    /// 获取支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_model(path: &Path, options: &LoaderConfig) -> Result<LoadedModel<tobj::Material>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            MeshAssemblyError::MeshLoading(MeshLoadError::UnsupportedFormat(
                "无法确定文件扩展名".to_string(),
            ))
        })?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path, options)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(ObjLoader::supported_extensions().contains(&"obj"));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_model(Path::new("model.fbx"), &LoaderConfig::default());
        assert!(matches!(
            result,
            Err(MeshAssemblyError::MeshLoading(MeshLoadError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_missing_extension() {
        assert!(load_model(Path::new("model"), &LoaderConfig::default()).is_err());
    }
}
