use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::queries::Query;

pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn build_schema(context: GraphQLContext) -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(context)
        .finish()
}
