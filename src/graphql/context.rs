use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{CategoryService, ReportService};

#[derive(Clone)]
pub struct GraphQLContext {
    pub db: DatabaseConnection,
    pub reports: Arc<ReportService>,
    pub categories: Arc<CategoryService>,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            reports: Arc::new(ReportService::new(db.clone())),
            categories: Arc::new(CategoryService::new(db.clone())),
            db,
        }
    }
}
