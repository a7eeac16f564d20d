/// 材质查找模块
///
/// 装配时按名字查询材质句柄。句柄对装配器是不透明的，找不到只是警告。
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// 材质库 trait
///
/// 把材质名映射到不透明的材质句柄。
pub trait MaterialLibrary {
    /// 材质句柄类型
    type Handle: Clone;

    /// 按名字查找材质
    fn lookup(&self, name: &str) -> Option<Self::Handle>;
}

impl<H: Clone, S: BuildHasher> MaterialLibrary for HashMap<String, H, S> {
    type Handle = H;

    fn lookup(&self, name: &str) -> Option<H> {
        self.get(name).cloned()
    }
}

impl<H: Clone> MaterialLibrary for BTreeMap<String, H> {
    type Handle = H;

    fn lookup(&self, name: &str) -> Option<H> {
        self.get(name).cloned()
    }
}

/// 子网格的材质槽
///
/// `handle` 为 `None` 表示材质库中没有这个名字，子网格不绑定材质。
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSlot<H> {
    /// 解析后的材质名
    pub name: String,

    /// 查找到的材质句柄
    pub handle: Option<H>,
}

impl<H> MaterialSlot<H> {
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_lookup() {
        let mut materials = HashMap::new();
        materials.insert("matA".to_string(), 1u32);

        assert_eq!(materials.lookup("matA"), Some(1));
        assert_eq!(materials.lookup("matC"), None);
    }

    #[test]
    fn test_btree_map_lookup() {
        let mut materials = BTreeMap::new();
        materials.insert("stone".to_string(), "stone.png");

        assert_eq!(materials.lookup("stone"), Some("stone.png"));
    }

    #[test]
    fn test_slot_binding() {
        let bound = MaterialSlot { name: "a".to_string(), handle: Some(0u8) };
        let unbound: MaterialSlot<u8> = MaterialSlot { name: "b".to_string(), handle: None };

        assert!(bound.is_bound());
        assert!(!unbound.is_bound());
    }
}
