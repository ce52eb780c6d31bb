pub mod categories;
pub mod customers;
pub mod dishes;
pub mod health;
pub mod reports;
pub mod restaurants;
pub mod reviews;
