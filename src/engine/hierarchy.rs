// ==========================================
// 设备维护管理系统 - 设备层级
// ==========================================
// 职责: 由 parent_id 构建设备树；设置上级时拒绝形成环
// 根节点: 无上级，或上级不在当前列表中
// ==========================================

use crate::domain::equipment::Equipment;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// 设备树节点
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentNode {
    pub equipment: Equipment,
    pub children: Vec<EquipmentNode>,
}

/// 构建设备森林（同级按编码排序）
pub fn build_equipment_tree(equipments: &[Equipment]) -> Vec<EquipmentNode> {
    let ids: HashSet<&str> = equipments.iter().map(|eq| eq.id.as_str()).collect();

    let mut children_of: HashMap<&str, Vec<&Equipment>> = HashMap::new();
    let mut roots: Vec<&Equipment> = Vec::new();

    for eq in equipments {
        match eq.parent_id.as_deref() {
            Some(parent) if ids.contains(parent) && parent != eq.id => {
                children_of.entry(parent).or_default().push(eq);
            }
            _ => roots.push(eq),
        }
    }

    roots.sort_by(|a, b| a.code.cmp(&b.code));

    let mut visited: HashSet<&str> = HashSet::new();
    roots
        .into_iter()
        .map(|root| build_node(root, &children_of, &mut visited))
        .collect()
}

fn build_node<'a>(
    equipment: &'a Equipment,
    children_of: &HashMap<&'a str, Vec<&'a Equipment>>,
    visited: &mut HashSet<&'a str>,
) -> EquipmentNode {
    visited.insert(equipment.id.as_str());

    let mut children: Vec<&Equipment> = children_of
        .get(equipment.id.as_str())
        .cloned()
        .unwrap_or_default();
    children.sort_by(|a, b| a.code.cmp(&b.code));

    let mut nodes = Vec::with_capacity(children.len());
    for child in children {
        // 存量数据中的环只展开一次
        if !visited.contains(child.id.as_str()) {
            nodes.push(build_node(child, children_of, visited));
        }
    }

    EquipmentNode {
        equipment: equipment.clone(),
        children: nodes,
    }
}

/// 将 `parent_id` 设为 `equipment_id` 的上级是否会形成环
///
/// 沿 parent 链自 parent_id 向上追溯，遇到 equipment_id 即成环
pub fn would_create_cycle(equipments: &[Equipment], equipment_id: &str, parent_id: &str) -> bool {
    if equipment_id == parent_id {
        return true;
    }

    let parents: HashMap<&str, Option<&str>> = equipments
        .iter()
        .map(|eq| (eq.id.as_str(), eq.parent_id.as_deref()))
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(id) = current {
        if id == equipment_id {
            return true;
        }
        if !seen.insert(id) {
            // 存量环，与本次设置无关
            return false;
        }
        current = parents.get(id).copied().flatten();
    }

    false
}
