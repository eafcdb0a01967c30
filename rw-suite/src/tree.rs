//! Tree rendering of a file's structure

use console::Style;

use rw_core::{ChunkNode, ChunkTree, Decoded};

use crate::registry::Asset;
use crate::summary::{Summary, version_label};

/// A line of the rendered tree and the lines below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub size: Option<u64>,
    pub detail: Option<String>,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Chunk,
    /// Struct, String and other payloads without nested chunks
    Data,
    File,
    Property,
}

#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            size: None,
            detail: None,
            children: Vec::new(),
        }
    }

    pub fn add_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl NodeType {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Root => "📁",
            Self::Chunk => "📦",
            Self::Data => "💾",
            Self::File => "📄",
            Self::Property => "🏷️",
        }
    }

    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            return Style::new();
        }
        match self {
            Self::Root => Style::new().bold().cyan(),
            Self::Chunk => Style::new().blue(),
            Self::Data => Style::new().white(),
            Self::File => Style::new().green(),
            Self::Property => Style::new().dim(),
        }
    }
}

/// Tree of a RenderWare stream; each chunk shows its payload size and
/// header offset
pub fn chunk_tree(file_name: &str, tree: &ChunkTree) -> TreeNode {
    let mut root = TreeNode::new(file_name, NodeType::Root);
    if let Some(first) = tree.roots.first() {
        root = root.with_detail(version_label(first.version));
    }
    root.children = tree.roots.iter().map(chunk_node).collect();
    if tree.trailing > 0 {
        root = root.add_child(
            TreeNode::new("trailing bytes", NodeType::Data).with_size(tree.trailing as u64),
        );
    }
    root
}

fn chunk_node(chunk: &ChunkNode) -> TreeNode {
    let node_type = if chunk.children.is_empty() {
        NodeType::Data
    } else {
        NodeType::Chunk
    };
    let name = match chunk.tag.name() {
        Some(name) => name.to_string(),
        None => format!("{:#x}", chunk.tag.0),
    };
    let mut node = TreeNode::new(name, node_type)
        .with_size(u64::from(chunk.length))
        .with_detail(format!("@{:#x}", chunk.offset));
    node.children = chunk.children.iter().map(chunk_node).collect();
    node
}

/// Tree of a decoded asset: archive entries, or the summary figures of
/// any other format
pub fn asset_tree(file_name: &str, decoded: &Decoded<Asset>) -> TreeNode {
    let summary = Summary::new(decoded);
    let mut root = TreeNode::new(file_name, NodeType::Root).with_detail(summary.description);

    if let Asset::Archive(archive) = &decoded.value {
        root.children = archive
            .entries
            .iter()
            .map(|entry| {
                TreeNode::new(&entry.name, NodeType::File)
                    .with_size(entry.data.len() as u64)
                    .with_detail(format!("sectors: {}", entry.sectors()))
            })
            .collect();
    } else {
        root.children = summary
            .stats
            .iter()
            .map(|stat| {
                TreeNode::new(format!("{}: {}", stat.label, stat.value), NodeType::Property)
            })
            .collect();
    }

    for warning in &summary.warnings {
        root = root.add_child(TreeNode::new(format!("warning: {warning}"), NodeType::Property));
    }
    root
}

/// Render a tree with box-drawing connectors
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    output.push_str(&format!(
        "{prefix}{connector}{} {}",
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));
    if let Some(size) = node.size {
        output.push_str(&format!(" ({})", format_bytes(size)));
    }
    if let Some(detail) = &node.detail {
        let dim = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        output.push_str(&format!(" {}", dim.apply_to(detail)));
    }
    output.push('\n');

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{}", if is_last { "    " } else { "│   " })
    };
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(child, output, &new_prefix, is_last_child, depth + 1, options);
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit_index])
    }
}
