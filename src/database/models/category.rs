use serde::Serialize;
use sqlx::FromRow;

/// Category row. Roots have no parent; subcategories reference exactly one
/// root (two-level tree, seeded out of band and read-only here).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

/// Root category with its direct children, as served by the categories
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub children: Vec<Category>,
}

/// Arrange a flat category list into root nodes with nested children.
/// Subcategories whose parent is missing from the input are dropped.
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let mut roots: Vec<CategoryNode> = categories
        .iter()
        .filter(|c| c.parent_id.is_none())
        .map(|c| CategoryNode { id: c.id, name: c.name.clone(), children: Vec::new() })
        .collect();

    for category in categories {
        let Some(parent_id) = category.parent_id else { continue };
        if let Some(root) = roots.iter_mut().find(|r| r.id == parent_id) {
            root.children.push(category);
        }
    }

    roots
}
