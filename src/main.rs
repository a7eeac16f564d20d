//! MeshAssembly - 模型装配命令行工具
//!
//! 加载一个 OBJ 文件，装配其中的所有对象并输出每个网格的统计信息。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用默认配置
//! cargo run -- model.obj
//!
//! # 指定配置文件并跳过切线计算
//! cargo run -- model.obj --config assembly.toml --no-tangents
//! ```
//!
//! # 命令行参数
//!
//! - `--config <path>`: 配置文件路径（默认 config.toml）
//! - `--no-tangents`: 跳过切线空间计算
//! - `--no-normals`: 不重建缺失的法线
//! - `--flip-v`: 翻转纹理坐标 V 轴
//! - `--log-level <value>`: 设置日志级别

use anyhow::{bail, Context};
use mesh_assembly::core::{log, Config};
use mesh_assembly::geometry::loaders::load_model;
use mesh_assembly::geometry::{MeshAssembler, Vertex};
use std::path::PathBuf;
use tracing::{info, warn};

/// 带值的参数，查找模型路径时需要跳过它们的值
const VALUE_FLAGS: &[&str] = &["--config", "--log-level"];

/// 应用程序入口点
///
/// # 流程
///
/// 1. 加载配置文件（config.toml 或 `--config` 指定的文件）
/// 2. 应用命令行参数覆盖
/// 3. 初始化日志系统
/// 4. 加载模型并累积几何数据
/// 5. 装配所有对象并输出统计
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. 加载配置（在初始化日志之前）
    let config_path = flag_value(&args, "--config").unwrap_or("config.toml");
    let mut config = Config::from_file_or_default(config_path);

    // 2. 应用命令行参数
    config.apply_args(&args);

    // 3. 验证配置
    config.validate().context("Invalid configuration")?;

    // 4. 初始化日志系统
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "MeshAssembly starting...");

    let Some(model_path) = model_path(&args) else {
        bail!("Usage: mesh_assembly <model.obj> [--config <path>] [--no-tangents] [--no-normals] [--flip-v]");
    };

    info!(
        default_material = %config.assembly.default_material,
        compute_tangents = config.assembly.compute_tangents,
        recalculate_normals = config.assembly.recalculate_normals,
        flip_v = config.loader.flip_v,
        "Assembly configuration"
    );

    // 5. 加载模型
    let model = load_model(&model_path, &config.loader)
        .with_context(|| format!("Failed to load {}", model_path.display()))?;
    model.buffer.log_summary();

    // 6. 装配
    let assembler = MeshAssembler::from_config(&config.assembly);
    let meshes = assembler.assemble_all(&model.buffer, &model.materials);

    for assembled in &meshes {
        let mesh = &assembled.mesh;
        let vertices = mesh.to_vertices();

        info!(
            name = mesh.name.as_deref().unwrap_or("<unnamed>"),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            submeshes = mesh.submesh_count(),
            tangents = mesh.tangents.is_some(),
            bytes = Vertex::as_bytes(&vertices).len(),
            "Mesh assembled"
        );

        for (i, slot) in assembled.materials.iter().enumerate() {
            if !slot.is_bound() {
                warn!(submesh = i, material = %slot.name, "Submesh has no bound material");
            }
        }
    }

    info!(meshes = meshes.len(), "Assembly finished");
    Ok(())
}

/// 获取带值参数的值
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).map(String::as_str)
}

/// 第一个不属于任何参数的位置参数
fn model_path(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_model_path_skips_flag_values() {
        let args = args(&["--config", "a.toml", "--flip-v", "scene.obj"]);
        assert_eq!(model_path(&args), Some(PathBuf::from("scene.obj")));
        assert_eq!(flag_value(&args, "--config"), Some("a.toml"));
    }

    #[test]
    fn test_model_path_missing() {
        assert_eq!(model_path(&args(&["--log-level", "debug"])), None);
        assert_eq!(flag_value(&args(&["--config"]), "--config"), None);
    }
}
