use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::graphql::types::Category;
use crate::services::report_service::{
    CheapestDish, CustomerContact, ReportKind, ReportOutput, ReportRequest, RestaurantDish,
    RestaurantName,
};

pub struct Query;

#[Object]
impl Query {
    /// All categories ordered by name
    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        let context = ctx.data::<GraphQLContext>()?;
        let categories = context.categories.list().await.to_graphql_result()?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    /// Restaurants whose dishes in a category average at least `score`
    async fn first(
        &self,
        ctx: &Context<'_>,
        category: String,
        score: f64,
    ) -> Result<Vec<RestaurantName>> {
        match run_report(ctx, ReportRequest::First { category, score }).await? {
            ReportOutput::Restaurants(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::First)),
        }
    }

    /// Customers who liked a restaurant carrying a category
    async fn second(&self, ctx: &Context<'_>, category: String) -> Result<Vec<CustomerContact>> {
        match run_report(ctx, ReportRequest::Second { category }).await? {
            ReportOutput::Customers(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Second)),
        }
    }

    /// Restaurants carrying every category of the named restaurant
    async fn third(&self, ctx: &Context<'_>, restaurant: String) -> Result<Vec<RestaurantName>> {
        match run_report(ctx, ReportRequest::Third { restaurant }).await? {
            ReportOutput::Restaurants(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Third)),
        }
    }

    /// Restaurants carrying exactly the categories of the named restaurant
    async fn fourth(&self, ctx: &Context<'_>, restaurant: String) -> Result<Vec<RestaurantName>> {
        match run_report(ctx, ReportRequest::Fourth { restaurant }).await? {
            ReportOutput::Restaurants(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Fourth)),
        }
    }

    /// Customers who reviewed a dish in every category
    async fn fifth(&self, ctx: &Context<'_>) -> Result<Vec<CustomerContact>> {
        match run_report(ctx, ReportRequest::Fifth).await? {
            ReportOutput::Customers(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Fifth)),
        }
    }

    /// Cheapest dish in a category whose ratings average at least `score`; at most one row
    async fn sixth(
        &self,
        ctx: &Context<'_>,
        category_id: i32,
        score: f64,
    ) -> Result<Vec<CheapestDish>> {
        match run_report(ctx, ReportRequest::Sixth { category_id, score }).await? {
            ReportOutput::CheapestDish(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Sixth)),
        }
    }

    /// Customers whose reviews average at most `score`
    async fn seventh(&self, ctx: &Context<'_>, score: f64) -> Result<Vec<CustomerContact>> {
        match run_report(ctx, ReportRequest::Seventh { score }).await? {
            ReportOutput::Customers(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Seventh)),
        }
    }

    /// Dishes in a category from restaurants whose reviews average at least `score`
    async fn eighth(
        &self,
        ctx: &Context<'_>,
        category_id: i32,
        score: f64,
    ) -> Result<Vec<RestaurantDish>> {
        match run_report(ctx, ReportRequest::Eighth { category_id, score }).await? {
            ReportOutput::Dishes(rows) => Ok(rows),
            _ => Err(unexpected_rows(ReportKind::Eighth)),
        }
    }
}

/// Validate and execute a report through the shared report service.
async fn run_report(ctx: &Context<'_>, request: ReportRequest) -> Result<ReportOutput> {
    let context = ctx.data::<GraphQLContext>()?;
    context.reports.run(request).await.to_graphql_result()
}

fn unexpected_rows(kind: ReportKind) -> Error {
    Error::new(format!("report {} returned rows of an unexpected shape", kind))
}
