use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create restaurants table
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Address).string().not_null())
                    .col(ColumnDef::new(Restaurants::Website).string().not_null())
                    .col(ColumnDef::new(Restaurants::Description).text().not_null())
                    .col(ColumnDef::new(Restaurants::Price).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Customers::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create dishes table; a category cannot be removed while dishes use it
        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dishes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dishes::Name).string().not_null())
                    .col(ColumnDef::new(Dishes::Price).double().not_null())
                    .col(ColumnDef::new(Dishes::Description).text().not_null())
                    .col(ColumnDef::new(Dishes::IsMain).boolean().not_null().default(false))
                    .col(ColumnDef::new(Dishes::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(Dishes::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_restaurant_id")
                            .from(Dishes::Table, Dishes::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_category_id")
                            .from(Dishes::Table, Dishes::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reviews table
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::Text).text().not_null())
                    .col(ColumnDef::new(Reviews::Score).integer().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Reviews::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(Reviews::CustomerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_restaurant_id")
                            .from(Reviews::Table, Reviews::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_customer_id")
                            .from(Reviews::Table, Reviews::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create dish_reviews table
        manager
            .create_table(
                Table::create()
                    .table(DishReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DishReviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DishReviews::ReviewId).integer().not_null())
                    .col(ColumnDef::new(DishReviews::DishId).integer().not_null())
                    .col(ColumnDef::new(DishReviews::Score).integer().not_null())
                    .col(ColumnDef::new(DishReviews::Comment).string_len(100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dish_reviews_review_id")
                            .from(DishReviews::Table, DishReviews::ReviewId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dish_reviews_dish_id")
                            .from(DishReviews::Table, DishReviews::DishId)
                            .to(Dishes::Table, Dishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create restaurant_categories join table
        manager
            .create_table(
                Table::create()
                    .table(RestaurantCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RestaurantCategories::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(RestaurantCategories::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_categories_restaurant_id")
                            .from(RestaurantCategories::Table, RestaurantCategories::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_categories_category_id")
                            .from(RestaurantCategories::Table, RestaurantCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create liked_restaurants join table
        manager
            .create_table(
                Table::create()
                    .table(LikedRestaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LikedRestaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LikedRestaurants::CustomerId).integer().not_null())
                    .col(ColumnDef::new(LikedRestaurants::RestaurantId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_liked_restaurants_customer_id")
                            .from(LikedRestaurants::Table, LikedRestaurants::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_liked_restaurants_restaurant_id")
                            .from(LikedRestaurants::Table, LikedRestaurants::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(LikedRestaurants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RestaurantCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DishReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(super) enum Restaurants {
    Table,
    Id,
    Name,
    Address,
    Website,
    Description,
    Price,
}

#[derive(Iden)]
pub(super) enum Categories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub(super) enum Customers {
    Table,
    Id,
    Name,
    Email,
    Password,
}

#[derive(Iden)]
pub(super) enum Dishes {
    Table,
    Id,
    Name,
    Price,
    Description,
    IsMain,
    RestaurantId,
    CategoryId,
}

#[derive(Iden)]
pub(super) enum Reviews {
    Table,
    Id,
    Text,
    Score,
    CreatedAt,
    RestaurantId,
    CustomerId,
}

#[derive(Iden)]
pub(super) enum DishReviews {
    Table,
    Id,
    ReviewId,
    DishId,
    Score,
    Comment,
}

#[derive(Iden)]
pub(super) enum RestaurantCategories {
    Table,
    Id,
    RestaurantId,
    CategoryId,
}

#[derive(Iden)]
pub(super) enum LikedRestaurants {
    Table,
    Id,
    CustomerId,
    RestaurantId,
}
