pub mod categories;
pub mod customers;
pub mod dish_reviews;
pub mod dishes;
pub mod liked_restaurants;
pub mod restaurant_categories;
pub mod restaurants;
pub mod reviews;
