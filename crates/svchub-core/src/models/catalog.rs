//! Service catalog listing and its grouped presentation

use std::collections::BTreeMap;

use serde::Deserialize;

use super::envelope::{impl_envelope, ResponseCode};

const UNGROUPED_TITLE: &str = "Other Services";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub catalog_list: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub uuid: Option<String>,
    pub name: String,
    pub parent_name: Option<String>,
}

/// A filter category with its selectable options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCategory {
    pub title: String,
    pub options: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOption {
    pub id: String,
    pub name: String,
}

impl CatalogOption {
    fn from_item(item: &CatalogItem) -> Self {
        let parent = item.parent_name.as_deref().unwrap_or("Ungrouped");
        Self {
            id: item
                .uuid
                .clone()
                .unwrap_or_else(|| format!("{parent}-{}", item.name)),
            name: item.name.clone(),
        }
    }
}

/// Group catalog items by parent category, sorting categories and options
/// case-insensitively.
pub fn group_catalog_items(items: &[CatalogItem]) -> Vec<CatalogCategory> {
    let mut grouped: BTreeMap<String, Vec<&CatalogItem>> = BTreeMap::new();
    for item in items {
        let title = item
            .parent_name
            .clone()
            .unwrap_or_else(|| UNGROUPED_TITLE.to_string());
        grouped.entry(title).or_default().push(item);
    }

    let mut categories: Vec<CatalogCategory> = grouped
        .into_iter()
        .map(|(title, mut items)| {
            items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            CatalogCategory {
                title,
                options: items.iter().map(|item| CatalogOption::from_item(item)).collect(),
            }
        })
        .collect();
    categories.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    categories
}

impl_envelope!(CatalogListResponse);
