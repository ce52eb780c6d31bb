pub mod category_service;
pub mod customer_service;
pub mod dish_service;
pub mod report_service;
pub mod restaurant_service;
pub mod review_service;
pub mod validation;

pub use category_service::CategoryService;
pub use customer_service::CustomerService;
pub use dish_service::DishService;
pub use report_service::ReportService;
pub use restaurant_service::RestaurantService;
pub use review_service::ReviewService;
pub use validation::ValidationService;
