/// OBJ 文件加载器
///
/// 逐行读取 Wavefront OBJ 记录并按文件顺序推送事件到 `GeometryBuffer`：
/// `o` / `g` / `usemtl` 分别对应对象、组和材质，几何记录追加到全局顶点池。
/// 位置、纹理坐标、法线保留各自的索引，去重交给装配阶段。
/// `mtllib` 引用的材质库使用 tobj crate 解析。
use super::{LoadedModel, ModelLoader};
use crate::core::config::LoaderConfig;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::buffer::{GeometryBuffer, DEFAULT_NAME};
use crate::geometry::face::FaceIndex;
use crate::math::{Vector2, Vector3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// OBJ 格式加载器
///
/// # 记录映射
///
/// | 记录 | 事件 |
/// |------|------|
/// | `o name` | `push_object` |
/// | `g name` | `push_group`（没有名字时生成 "Unnamed-N"） |
/// | `usemtl name` | `push_material` |
/// | `v` / `vt` / `vn` | 追加到对应顶点池 |
/// | `f` | 多边形按扇形三角化后逐个角点 `push_face` |
///
/// 其余记录（`s`、`l`、`p` 等）忽略。
pub struct ObjLoader;

impl ObjLoader {
    /// 从内存加载，同时提供 `mtllib` 引用的材质库内容
    pub fn load_from_memory_with_materials(
        data: &[u8],
        mtl: Option<&[u8]>,
        options: &LoaderConfig,
    ) -> Result<LoadedModel<tobj::Material>> {
        parse_obj(data, options, |_| match mtl {
            Some(bytes) => {
                let mut reader = bytes;
                tobj::load_mtl_buf(&mut reader).map(|(materials, _)| materials)
            }
            None => Err(tobj::LoadError::OpenFileFailed),
        })
    }
}

impl ModelLoader for ObjLoader {
    type Material = tobj::Material;

    fn load_from_file(path: &Path, options: &LoaderConfig) -> Result<LoadedModel<tobj::Material>> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let directory = path.parent().unwrap_or(Path::new("."));
        let reader = BufReader::new(File::open(path)?);

        let model = parse_obj(reader, options, |library| {
            tobj::load_mtl(directory.join(library)).map(|(materials, _)| materials)
        })?;

        tracing::info!(
            "成功加载 OBJ 文件 {}: {} 个对象, {} 个材质",
            path.display(),
            model.buffer.object_count(),
            model.materials.len()
        );

        Ok(model)
    }

    fn load_from_memory(data: &[u8], options: &LoaderConfig) -> Result<LoadedModel<tobj::Material>> {
        Self::load_from_memory_with_materials(data, None, options)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

/// 读取全部记录，返回缓冲和材质库
///
/// `load_mtl` 按 `mtllib` 中的文件名返回材质列表；失败只记录警告。
fn parse_obj<R, F>(reader: R, options: &LoaderConfig, mut load_mtl: F) -> Result<LoadedModel<tobj::Material>>
where
    R: BufRead,
    F: FnMut(&str) -> std::result::Result<Vec<tobj::Material>, tobj::LoadError>,
{
    let mut buffer = GeometryBuffer::new();
    let mut materials = HashMap::new();
    let mut corners = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let line = line.trim();

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(rest, 3, line_number)?;
                buffer.push_position(Vector3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(rest, 1, line_number)?;
                let v = if options.flip_v { 1.0 - v } else { v };
                buffer.push_texcoord(Vector2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(rest, 3, line_number)?;
                buffer.push_normal(Vector3::new(x, y, z));
            }
            "f" => {
                corners.clear();
                for token in rest.split_whitespace() {
                    corners.push(parse_corner(token, &buffer, line_number)?);
                }
                if corners.len() < 3 {
                    return Err(parse_error(line_number, "面至少需要3个角点").into());
                }

                // 扇形三角化，保持绕序
                for i in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[i], corners[i + 1]] {
                        buffer.push_face(corner)?;
                    }
                }
            }
            "o" => buffer.push_object(if rest.is_empty() { DEFAULT_NAME } else { rest }),
            "g" => buffer.push_group((!rest.is_empty()).then_some(rest)),
            "usemtl" if !rest.is_empty() => buffer.push_material(rest),
            "mtllib" => {
                for library in rest.split_whitespace() {
                    match load_mtl(library) {
                        Ok(loaded) => {
                            materials.extend(loaded.into_iter().map(|m| (m.name.clone(), m)));
                        }
                        Err(e) => {
                            tracing::warn!("材质库 {} 加载失败: {}，引用的材质将不绑定", library, e);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(LoadedModel { buffer, materials })
}

/// 解析最多 `N` 个浮点数，至少需要 `required` 个，缺失的分量为 0
fn parse_floats<const N: usize>(rest: &str, required: usize, line_number: usize) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    let mut count = 0;

    for (slot, token) in values.iter_mut().zip(rest.split_whitespace()) {
        *slot = token
            .parse()
            .map_err(|_| parse_error(line_number, &format!("无效的数值: {}", token)))?;
        count += 1;
    }

    if count < required {
        return Err(parse_error(
            line_number,
            &format!("需要 {} 个分量，只有 {} 个", required, count),
        )
        .into());
    }

    Ok(values)
}

/// 解析 `v`、`v/vt`、`v//vn`、`v/vt/vn` 形式的角点
///
/// 正索引从 1 开始；负索引相对于当前顶点池末尾。
fn parse_corner(token: &str, buffer: &GeometryBuffer, line_number: usize) -> Result<FaceIndex> {
    let mut parts = token.split('/');

    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, buffer.positions().len(), line_number)?,
        _ => return Err(parse_error(line_number, &format!("角点缺少位置索引: {}", token)).into()),
    };

    let texcoord = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, buffer.texcoords().len(), line_number)?),
        _ => None,
    };

    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, buffer.normals().len(), line_number)?),
        _ => None,
    };

    Ok(FaceIndex::new(position, texcoord, normal))
}

fn resolve_index(token: &str, pool_len: usize, line_number: usize) -> Result<u32> {
    let value: i64 = token
        .parse()
        .map_err(|_| parse_error(line_number, &format!("无效的索引: {}", token)))?;

    let resolved = match value {
        0 => return Err(parse_error(line_number, "索引不能为 0").into()),
        v if v > 0 => v - 1,
        v => pool_len as i64 + v,
    };

    u32::try_from(resolved)
        .map_err(|_| parse_error(line_number, &format!("索引超出范围: {}", token)).into())
}

fn parse_error(line_number: usize, reason: &str) -> MeshLoadError {
    MeshLoadError::ParseError(format!("第 {} 行: {}", line_number, reason))
}
