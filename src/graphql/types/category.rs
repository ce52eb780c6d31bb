use async_graphql::*;

use crate::database::entities::categories;

#[derive(SimpleObject, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
