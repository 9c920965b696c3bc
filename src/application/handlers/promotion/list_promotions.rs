//! ListPromotionsHandler - Query handler for the promotion list.
//!
//! Storage filters by kind and search text; archive and status filters
//! are applied here after deriving every status at one instant.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::promotion::{DiscountKindTag, PromotionError, PromotionStatus, PromotionView};
use crate::ports::{Clock, PromotionQuery, PromotionRepository};

/// Query for listing promotions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPromotionsQuery {
    /// `true` lists expired promotions only, `false` everything else.
    #[serde(default)]
    pub archived: bool,
    pub status: Option<PromotionStatus>,
    pub kind: Option<DiscountKindTag>,
    /// Case-insensitive substring of code or name.
    pub query: Option<String>,
}

impl ListPromotionsQuery {
    fn admits(&self, status: PromotionStatus) -> bool {
        let archived = status == PromotionStatus::Expired;
        archived == self.archived && self.status.map_or(true, |wanted| wanted == status)
    }
}

/// Handler for listing promotions.
pub struct ListPromotionsHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
}

impl ListPromotionsHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Returns matching promotions, newest first.
    #[tracing::instrument(
        name = "promotions.list",
        skip(self, query),
        fields(archived = query.archived),
        err
    )]
    pub async fn handle(&self, query: ListPromotionsQuery) -> Result<Vec<PromotionView>, PromotionError> {
        let storage_query = PromotionQuery {
            kind: query.kind,
            search: query.query.clone(),
        };
        let now = self.clock.now();

        Ok(self
            .repository
            .list(&storage_query)
            .await?
            .into_iter()
            .map(|p| p.view_at(now))
            .filter(|view| query.admits(view.status))
            .collect())
    }
}
