//! Output entries of the linked-service config file.

use serde::Serialize;

use wsops_core::{ItemKind, WarehouseDetails, WorkspaceId, WorkspaceItem};

/// Folder every lakehouse entry points at.
pub const LAKEHOUSE_ROOT_FOLDER: &str = "Tables";

/// Connection metadata; exactly one of `endpoint` / `root_folder` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeProperties {
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedServiceEntry {
    pub type_properties: TypeProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub name: String,
    /// Key in the merged config: the listing's display name.
    #[serde(skip)]
    pub key: String,
    #[serde(skip)]
    pub kind: ItemKind,
}

impl LinkedServiceEntry {
    pub fn lakehouse(item: &WorkspaceItem, workspace: &WorkspaceId) -> Self {
        Self {
            type_properties: TypeProperties {
                artifact_id: item.id.0.clone(),
                endpoint: None,
                workspace_id: workspace.0.clone(),
                root_folder: Some(LAKEHOUSE_ROOT_FOLDER.to_string()),
            },
            object_id: None,
            name: item.display_name.clone(),
            key: item.display_name.clone(),
            kind: ItemKind::Lakehouse,
        }
    }

    /// `item` is the listing entry; `details` the per-warehouse lookup.
    pub fn warehouse(
        item: &WorkspaceItem,
        details: &WarehouseDetails,
        workspace: &WorkspaceId,
    ) -> Self {
        Self {
            type_properties: TypeProperties {
                artifact_id: details.id.0.clone(),
                endpoint: Some(details.properties.connection_string.clone()),
                workspace_id: workspace.0.clone(),
                root_folder: None,
            },
            object_id: Some(details.id.0.clone()),
            name: details.display_name.clone(),
            key: item.display_name.clone(),
            kind: ItemKind::Warehouse,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use wsops_core::types::WarehouseProperties;

    use super::*;

    #[test]
    fn lakehouse_shape() {
        let item = WorkspaceItem {
            id: "L1".into(),
            display_name: "Sales".into(),
            item_type: "Lakehouse".into(),
        };
        let entry = LinkedServiceEntry::lakehouse(&item, &WorkspaceId::from("wsL"));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "typeProperties": {"artifactId": "L1", "workspaceId": "wsL", "rootFolder": "Tables"},
                "name": "Sales"
            })
        );
    }

    #[test]
    fn warehouse_shape_keeps_field_order() {
        let details = WarehouseDetails {
            id: "W1".into(),
            display_name: "Finance".into(),
            properties: WarehouseProperties {
                connection_string: "cs.datawarehouse.example".into(),
            },
        };
        let item = WorkspaceItem {
            id: "W1".into(),
            display_name: "Finance".into(),
            item_type: "Warehouse".into(),
        };
        let entry = LinkedServiceEntry::warehouse(&item, &details, &WorkspaceId::from("wsW"));
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            text,
            r#"{"typeProperties":{"artifactId":"W1","endpoint":"cs.datawarehouse.example","workspaceId":"wsW"},"objectId":"W1","name":"Finance"}"#
        );
    }

    #[rstest]
    #[case("Sales")]
    #[case("sales raw")]
    #[case("Área_01")]
    fn display_name_is_used_verbatim(#[case] name: &str) {
        let item = WorkspaceItem {
            id: "L9".into(),
            display_name: name.into(),
            item_type: "Lakehouse".into(),
        };
        let entry = LinkedServiceEntry::lakehouse(&item, &WorkspaceId::from("wsL"));
        assert_eq!(entry.name, name);
        assert_eq!(entry.kind, ItemKind::Lakehouse);
    }

    #[test]
    fn warehouse_key_comes_from_listing_and_name_from_details() {
        let item = WorkspaceItem {
            id: "W1".into(),
            display_name: "Finance DW".into(),
            item_type: "Warehouse".into(),
        };
        let details = WarehouseDetails {
            id: "W1".into(),
            display_name: "finance_dw".into(),
            properties: WarehouseProperties {
                connection_string: "cs".into(),
            },
        };
        let entry = LinkedServiceEntry::warehouse(&item, &details, &WorkspaceId::from("wsW"));
        assert_eq!(entry.key, "Finance DW");
        assert_eq!(entry.name, "finance_dw");
    }
}
