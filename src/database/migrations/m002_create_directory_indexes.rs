use sea_orm_migration::prelude::*;

use super::m001_create_directory_tables::{
    DishReviews, Dishes, LikedRestaurants, RestaurantCategories, Reviews,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Join pairs are unique so the category-set reports can count rows safely
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_categories_unique")
                    .table(RestaurantCategories::Table)
                    .col(RestaurantCategories::RestaurantId)
                    .col(RestaurantCategories::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_liked_restaurants_unique")
                    .table(LikedRestaurants::Table)
                    .col(LikedRestaurants::CustomerId)
                    .col(LikedRestaurants::RestaurantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dish_reviews_unique")
                    .table(DishReviews::Table)
                    .col(DishReviews::ReviewId)
                    .col(DishReviews::DishId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes used by the reporting joins
        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_category_id")
                    .table(Dishes::Table)
                    .col(Dishes::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_restaurant_id")
                    .table(Dishes::Table)
                    .col(Dishes::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_restaurant_id")
                    .table(Reviews::Table)
                    .col(Reviews::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_customer_id")
                    .table(Reviews::Table)
                    .col(Reviews::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_reviews_customer_id").table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_restaurant_id").table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_dishes_restaurant_id").table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_dishes_category_id").table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_dish_reviews_unique")
                    .table(DishReviews::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_liked_restaurants_unique")
                    .table(LikedRestaurants::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_restaurant_categories_unique")
                    .table(RestaurantCategories::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
