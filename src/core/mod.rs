//! 核心功能模块
//!
//! 提供日志系统、配置管理和错误处理。
//! 这些模块与具体的几何处理逻辑解耦，可以被库和命令行程序共同使用。
//!
//! # 模块组织
//!
//! - `log`：日志系统，同时作为装配流程的诊断输出
//! - `config`：配置管理，支持从 TOML 文件加载装配选项
//! - `error`：错误处理，定义统一的错误类型

pub mod log;
pub mod config;
pub mod error;

// 重新导出常用类型，方便使用
pub use error::{
    AssemblyError, Attribute, GeometryError, MeshAssemblyError, MeshLoadError, Result,
    TangentError,
};
pub use config::Config;
