use clap::Args;
use uuid::Uuid;

use codeflow_daemon::http_server::api::client::ApiError;
use codeflow_daemon::http_server::api::v0::tree::TreeRequest;
use common::prelude::{NodeKind, TreeNode};

#[derive(Args, Debug, Clone)]
pub struct Tree {
    /// Space ID (or use --name)
    #[arg(long, group = "space_identifier")]
    pub space_id: Option<Uuid>,

    /// Space name (or use --space-id)
    #[arg(long, group = "space_identifier")]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Either --space-id or --name must be provided")]
    NoSpaceIdentifier,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Tree {
    type Error = TreeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();

        let space_id = if let Some(id) = self.space_id {
            id
        } else if let Some(ref name) = self.name {
            client.resolve_space_name(name).await?
        } else {
            return Err(TreeError::NoSpaceIdentifier);
        };

        let roots = client.call(TreeRequest { space_id }).await?;
        if roots.is_empty() {
            return Ok("Space is empty".to_string());
        }

        let mut lines = Vec::new();
        for node in &roots {
            render(node, 0, &mut lines);
        }
        Ok(lines.join("\n"))
    }
}

fn render(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match node.kind {
        NodeKind::Vault => lines.push(format!("{}{}/", indent, node.name)),
        NodeKind::Log => lines.push(format!(
            "{}{} [{}]",
            indent,
            node.name,
            node.language.as_deref().unwrap_or("?")
        )),
    }
    for child in &node.children {
        render(child, depth + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, kind: NodeKind, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            language: matches!(kind, NodeKind::Log).then(|| "rust".to_string()),
            path: name.to_string(),
            children,
        }
    }

    #[test]
    fn test_render_indents_children() {
        let tree = node(
            "src",
            NodeKind::Vault,
            vec![
                node("util", NodeKind::Vault, vec![]),
                node("main.rs", NodeKind::Log, vec![]),
            ],
        );

        let mut lines = Vec::new();
        render(&tree, 0, &mut lines);
        assert_eq!(lines, vec!["src/", "  util/", "  main.rs [rust]"]);
    }
}
