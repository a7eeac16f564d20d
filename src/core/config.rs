//! 配置管理模块
//!
//! 提供装配流程配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (mesh_assembly.toml)
//!
//! ```toml
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! log_file = "mesh_assembly.log"
//!
//! [assembly]
//! default_material = "default"
//! compute_tangents = true
//! recalculate_normals = true
//! max_vertices_per_mesh = 649990
//!
//! [loader]
//! flip_v = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};

/// 装配配置
///
/// 所有字段都有默认值，配置文件中缺失的段落会自动补全。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 网格装配配置
    #[serde(default)]
    pub assembly: AssemblyConfig,

    /// 模型加载配置
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// 网格装配配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// 组没有材质时使用的材质名
    #[serde(default = "default_material")]
    pub default_material: String,

    /// 是否在装配后计算切线空间
    #[serde(default = "default_compute_tangents")]
    pub compute_tangents: bool,

    /// 对象缺少法线时是否从几何重建
    #[serde(default = "default_recalculate_normals")]
    pub recalculate_normals: bool,

    /// 单个网格的顶点数上限
    ///
    /// 超出时只记录警告，不截断输出。
    #[serde(default = "default_max_vertices")]
    pub max_vertices_per_mesh: usize,
}

/// 模型加载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// 是否翻转纹理坐标的 V 轴（1.0 - v）
    #[serde(default = "default_flip_v")]
    pub flip_v: bool,
}

// 默认值函数
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "mesh_assembly.log".to_string() }
fn default_material() -> String { "default".to_string() }
fn default_compute_tangents() -> bool { true }
fn default_recalculate_normals() -> bool { true }
fn default_max_vertices() -> usize { 649_990 }
fn default_flip_v() -> bool { false }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            default_material: default_material(),
            compute_tangents: default_compute_tangents(),
            recalculate_normals: default_recalculate_normals(),
            max_vertices_per_mesh: default_max_vertices(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            flip_v: default_flip_v(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use mesh_assembly::core::Config;
    ///
    /// let config = Config::from_file("mesh_assembly.toml")?;
    /// # Ok::<(), mesh_assembly::core::MeshAssemblyError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--no-tangents`: 跳过切线空间计算
    /// - `--no-normals`: 不重建缺失的法线
    /// - `--flip-v`: 翻转纹理坐标 V 轴
    /// - `--log-level <value>`: 设置日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if args.iter().any(|a| a == "--no-tangents") {
            self.assembly.compute_tangents = false;
        }

        if args.iter().any(|a| a == "--no-normals") {
            self.assembly.recalculate_normals = false;
        }

        if args.iter().any(|a| a == "--flip-v") {
            self.loader.flip_v = true;
        }

        if let Some(idx) = args.iter().position(|a| a == "--log-level") {
            if let Some(level) = args.get(idx + 1).and_then(|s| LogLevel::parse(s)) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.assembly.default_material.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "assembly.default_material".to_string(),
                reason: "Default material name must not be empty".to_string(),
            }
            .into());
        }

        if self.assembly.max_vertices_per_mesh == 0 {
            return Err(ConfigError::InvalidValue {
                field: "assembly.max_vertices_per_mesh".to_string(),
                reason: "Vertex limit must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// 从字符串解析日志级别（不区分大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
