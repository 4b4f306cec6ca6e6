use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Log, Vault};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Vault,
    Log,
}

/// One node of the nested view handed to the file explorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_log(log: &Log) -> Self {
        Self {
            id: log.id,
            name: log.name.clone(),
            kind: NodeKind::Log,
            language: Some(log.language.clone()),
            path: log.path.clone(),
            children: Vec::new(),
        }
    }
}

/// Nest a flat set of vaults and logs into a forest.
///
/// Roots are vaults without a parent, plus vaults whose parent is not in
/// `vaults`. A vault's children are its child vaults in input order followed
/// by its logs in input order. Logs pointing at a vault that is not present
/// are left out.
pub fn build_tree(vaults: &[Vault], logs: &[Log]) -> Vec<TreeNode> {
    let present: HashSet<Uuid> = vaults.iter().map(|v| v.id).collect();

    let mut child_vaults: HashMap<Uuid, Vec<&Vault>> = HashMap::new();
    let mut roots = Vec::new();
    for vault in vaults {
        match vault.parent_vault_id {
            Some(parent) if present.contains(&parent) && parent != vault.id => {
                child_vaults.entry(parent).or_default().push(vault)
            }
            _ => roots.push(vault),
        }
    }

    let mut vault_logs: HashMap<Uuid, Vec<&Log>> = HashMap::new();
    for log in logs {
        if present.contains(&log.vault_id) {
            vault_logs.entry(log.vault_id).or_default().push(log);
        }
    }

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|vault| build_node(vault, &child_vaults, &vault_logs, &mut visited))
        .collect()
}

fn build_node(
    vault: &Vault,
    child_vaults: &HashMap<Uuid, Vec<&Vault>>,
    vault_logs: &HashMap<Uuid, Vec<&Log>>,
    visited: &mut HashSet<Uuid>,
) -> Option<TreeNode> {
    // parent cycles in stored data must not recurse forever
    if !visited.insert(vault.id) {
        return None;
    }

    let mut children: Vec<TreeNode> = child_vaults
        .get(&vault.id)
        .into_iter()
        .flatten()
        .filter_map(|child| build_node(child, child_vaults, vault_logs, visited))
        .collect();
    children.extend(
        vault_logs
            .get(&vault.id)
            .into_iter()
            .flatten()
            .map(|log| TreeNode::from_log(log)),
    );

    Some(TreeNode {
        id: vault.id,
        name: vault.name.clone(),
        kind: NodeKind::Vault,
        language: None,
        path: vault.path.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::owner::OwnerId;

    fn vault(name: &str, path: &str, parent: Option<Uuid>, space_id: Uuid) -> Vault {
        let now = OffsetDateTime::now_utc();
        Vault {
            id: Uuid::new_v4(),
            space_id,
            owner_id: OwnerId::default(),
            name: name.to_string(),
            path: path.to_string(),
            parent_vault_id: parent,
            created_at: now,
            updated_at: now,
        }
    }

    fn log(name: &str, vault: &Vault) -> Log {
        let now = OffsetDateTime::now_utc();
        Log {
            id: Uuid::new_v4(),
            space_id: vault.space_id,
            vault_id: vault.id,
            owner_id: OwnerId::default(),
            name: name.to_string(),
            path: format!("{}/{}", vault.path, name),
            language: "javascript".to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[], &[]).is_empty());
    }

    #[test]
    fn test_child_vaults_precede_logs() {
        let space_id = Uuid::new_v4();
        let root = vault("root", "root", None, space_id);
        let child = vault("child", "root/child", Some(root.id), space_id);
        let a = log("a.js", &root);
        let b = log("b.js", &root);

        let tree = build_tree(&[root.clone(), child.clone()], &[a.clone(), b.clone()]);

        assert_eq!(tree.len(), 1);
        let node = &tree[0];
        assert_eq!(node.id, root.id);
        assert_eq!(node.kind, NodeKind::Vault);
        let ids: Vec<Uuid> = node.children.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![child.id, a.id, b.id]);
        assert_eq!(node.children[1].language.as_deref(), Some("javascript"));
    }

    #[test]
    fn test_vault_with_missing_parent_becomes_root() {
        let space_id = Uuid::new_v4();
        let orphan = vault("orphan", "gone/orphan", Some(Uuid::new_v4()), space_id);

        let tree = build_tree(&[orphan.clone()], &[]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, orphan.id);
    }

    #[test]
    fn test_log_with_missing_vault_is_dropped() {
        let space_id = Uuid::new_v4();
        let root = vault("root", "root", None, space_id);
        let elsewhere = vault("elsewhere", "elsewhere", None, space_id);
        let stray = log("stray.py", &elsewhere);

        let tree = build_tree(&[root], &[stray]);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let space_id = Uuid::new_v4();
        let mut a = vault("a", "a", None, space_id);
        let mut b = vault("b", "a/b", None, space_id);
        a.parent_vault_id = Some(b.id);
        b.parent_vault_id = Some(a.id);

        // neither is a root, so nothing is reachable
        assert!(build_tree(&[a, b], &[]).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let space_id = Uuid::new_v4();
        let root = vault("root", "root", None, space_id);
        let file = log("main.rs", &root);

        let json = serde_json::to_value(build_tree(&[root], &[file])).unwrap();

        assert_eq!(json[0]["type"], "vault");
        assert!(json[0].get("language").is_none());
        assert_eq!(json[0]["children"][0]["type"], "log");
        assert!(json[0]["children"][0].get("children").is_none());
    }
}
