use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use crate::modules::content::model::PopularItem;

/// A drag inside the admin working copy. Nothing is persisted.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub items: Vec<PopularItem>,
    pub from_index: usize,
    pub to_index: usize,
}

/// The full popular order to persist, first id gets rank 1.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommitRequest {
    pub order: Vec<Uuid>,
}
