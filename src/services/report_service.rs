//! Reporting queries over the restaurant directory
//!
//! Eight fixed analytical questions, each answered by a single parameterized
//! SQL statement so that every report reads one consistent snapshot. The
//! service never writes. An empty result is a normal answer, never an error.
//!
//! All averages are computed over `CAST(score AS REAL)` so fractional means
//! are compared exactly. Every statement ends with an `ORDER BY` that makes
//! repeated runs return rows in the same order.

use std::fmt;
use std::str::FromStr;

use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::validation::ValidationService;

// Reports 1 and 6 reach dishes through dish reviews, 8 through restaurant reviews.

const RESTAURANTS_ABOVE_AVG_DISH_SCORE_IN_CATEGORY: &str = r#"
SELECT r.name AS name
FROM restaurants AS r
INNER JOIN reviews AS rev ON rev.restaurant_id = r.id
INNER JOIN dish_reviews AS dr ON dr.review_id = rev.id
INNER JOIN dishes AS d ON d.id = dr.dish_id
INNER JOIN categories AS c ON c.id = d.category_id
WHERE c.name = ?
GROUP BY r.id, r.name
HAVING AVG(CAST(dr.score AS REAL)) >= ?
ORDER BY r.name, r.id
"#;

const CUSTOMERS_WITH_LIKED_RESTAURANT_IN_CATEGORY: &str = r#"
SELECT DISTINCT cu.name AS name, cu.email AS email
FROM customers AS cu
INNER JOIN liked_restaurants AS l ON l.customer_id = cu.id
INNER JOIN restaurant_categories AS rc ON rc.restaurant_id = l.restaurant_id
INNER JOIN categories AS c ON c.id = rc.category_id
WHERE c.name = ?
ORDER BY cu.name, cu.email
"#;

// The reference set is computed once in a CTE; matched categories are
// counted DISTINCT so the comparison holds even without the unique index.
const RESTAURANTS_WITH_SUPERSET_OF_CATEGORIES: &str = r#"
WITH reference AS (
    SELECT DISTINCT rc.category_id
    FROM restaurants AS r
    INNER JOIN restaurant_categories AS rc ON rc.restaurant_id = r.id
    WHERE r.name = ?
)
SELECT r.name AS name
FROM restaurants AS r
INNER JOIN restaurant_categories AS rc ON rc.restaurant_id = r.id
WHERE rc.category_id IN (SELECT category_id FROM reference)
GROUP BY r.id, r.name
HAVING COUNT(DISTINCT rc.category_id) = (SELECT COUNT(*) FROM reference)
ORDER BY r.name, r.id
"#;

// Equality needs both conditions: same cardinality and no category outside
// the reference set.
const RESTAURANTS_WITH_EXACT_CATEGORY_SET: &str = r#"
WITH reference AS (
    SELECT DISTINCT rc.category_id
    FROM restaurants AS r
    INNER JOIN restaurant_categories AS rc ON rc.restaurant_id = r.id
    WHERE r.name = ?
)
SELECT r.name AS name
FROM restaurants AS r
INNER JOIN restaurant_categories AS rc ON rc.restaurant_id = r.id
GROUP BY r.id, r.name
HAVING COUNT(DISTINCT rc.category_id) = (SELECT COUNT(*) FROM reference)
   AND SUM(CASE WHEN rc.category_id IN (SELECT category_id FROM reference) THEN 0 ELSE 1 END) = 0
ORDER BY r.name, r.id
"#;

// Left joins keep customers without dish reviews in the grouping, so an
// empty catalog (0 = 0) admits everyone.
const CUSTOMERS_REVIEWING_EVERY_CATEGORY: &str = r#"
SELECT cu.name AS name, cu.email AS email
FROM customers AS cu
LEFT JOIN reviews AS rev ON rev.customer_id = cu.id
LEFT JOIN dish_reviews AS dr ON dr.review_id = rev.id
LEFT JOIN dishes AS d ON d.id = dr.dish_id
GROUP BY cu.id, cu.name, cu.email
HAVING COUNT(DISTINCT d.category_id) = (SELECT COUNT(*) FROM categories)
ORDER BY cu.name, cu.email
"#;

const CHEAPEST_DISH_ABOVE_SCORE_IN_CATEGORY: &str = r#"
SELECT d.name AS name, d.price AS price, r.name AS restaurant,
       AVG(CAST(dr.score AS REAL)) AS score
FROM dishes AS d
INNER JOIN dish_reviews AS dr ON dr.dish_id = d.id
INNER JOIN restaurants AS r ON r.id = d.restaurant_id
WHERE d.category_id = ?
GROUP BY d.id, d.name, d.price, r.name
HAVING AVG(CAST(dr.score AS REAL)) >= ?
ORDER BY d.price ASC, d.id ASC
LIMIT 1
"#;

const CUSTOMERS_WITH_AVG_REVIEW_SCORE_BELOW: &str = r#"
SELECT cu.name AS name, cu.email AS email
FROM customers AS cu
INNER JOIN reviews AS rev ON rev.customer_id = cu.id
GROUP BY cu.id, cu.name, cu.email
HAVING AVG(CAST(rev.score AS REAL)) <= ?
ORDER BY cu.name, cu.email
"#;

const DISHES_IN_CATEGORY_WITH_RESTAURANT_AVG_ABOVE: &str = r#"
SELECT DISTINCT r.name AS restaurant, d.name AS name
FROM dishes AS d
INNER JOIN restaurants AS r ON r.id = d.restaurant_id
INNER JOIN (
    SELECT restaurant_id, AVG(CAST(score AS REAL)) AS avg_score
    FROM reviews
    GROUP BY restaurant_id
) AS s ON s.restaurant_id = r.id
WHERE d.category_id = ? AND s.avg_score >= ?
ORDER BY r.name, d.name
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct RestaurantName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct CheapestDish {
    pub name: String,
    pub price: f64,
    pub restaurant: String,
    /// Mean dish-review score
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct RestaurantDish {
    pub restaurant: String,
    pub name: String,
}

/// Report names as exposed on the CLI and the HTTP API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
}

impl ReportKind {
    pub const ALL: [ReportKind; 8] = [
        ReportKind::First,
        ReportKind::Second,
        ReportKind::Third,
        ReportKind::Fourth,
        ReportKind::Fifth,
        ReportKind::Sixth,
        ReportKind::Seventh,
        ReportKind::Eighth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::First => "first",
            ReportKind::Second => "second",
            ReportKind::Third => "third",
            ReportKind::Fourth => "fourth",
            ReportKind::Fifth => "fifth",
            ReportKind::Sixth => "sixth",
            ReportKind::Seventh => "seventh",
            ReportKind::Eighth => "eighth",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::First => "Restaurants whose dishes in a category average at least a score",
            ReportKind::Second => "Customers who liked a restaurant carrying a category",
            ReportKind::Third => "Restaurants carrying every category of a reference restaurant",
            ReportKind::Fourth => "Restaurants carrying exactly the categories of a reference restaurant",
            ReportKind::Fifth => "Customers who reviewed a dish in every category",
            ReportKind::Sixth => "Cheapest dish in a category averaging at least a score",
            ReportKind::Seventh => "Customers whose reviews average at most a score",
            ReportKind::Eighth => "Dishes in a category from restaurants averaging at least a score",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| DirectoryError::validation("report", format!("unknown report '{}'", s)))
    }
}

/// A report together with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "lowercase")]
pub enum ReportRequest {
    First { category: String, score: f64 },
    Second { category: String },
    Third { restaurant: String },
    Fourth { restaurant: String },
    Fifth,
    Sixth { category_id: i32, score: f64 },
    Seventh { score: f64 },
    Eighth { category_id: i32, score: f64 },
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::First { .. } => ReportKind::First,
            ReportRequest::Second { .. } => ReportKind::Second,
            ReportRequest::Third { .. } => ReportKind::Third,
            ReportRequest::Fourth { .. } => ReportKind::Fourth,
            ReportRequest::Fifth => ReportKind::Fifth,
            ReportRequest::Sixth { .. } => ReportKind::Sixth,
            ReportRequest::Seventh { .. } => ReportKind::Seventh,
            ReportRequest::Eighth { .. } => ReportKind::Eighth,
        }
    }

    /// Reject blank names and non-positive scores or ids, trimming strings.
    pub fn validate(self) -> DirectoryResult<Self> {
        Ok(match self {
            ReportRequest::First { category, score } => ReportRequest::First {
                category: ValidationService::validate_text("category", &category)?,
                score: ValidationService::validate_positive_score("score", score)?,
            },
            ReportRequest::Second { category } => ReportRequest::Second {
                category: ValidationService::validate_text("category", &category)?,
            },
            ReportRequest::Third { restaurant } => ReportRequest::Third {
                restaurant: ValidationService::validate_text("restaurant", &restaurant)?,
            },
            ReportRequest::Fourth { restaurant } => ReportRequest::Fourth {
                restaurant: ValidationService::validate_text("restaurant", &restaurant)?,
            },
            ReportRequest::Fifth => ReportRequest::Fifth,
            ReportRequest::Sixth { category_id, score } => ReportRequest::Sixth {
                category_id: ValidationService::validate_id("category_id", category_id)?,
                score: ValidationService::validate_positive_score("score", score)?,
            },
            ReportRequest::Seventh { score } => ReportRequest::Seventh {
                score: ValidationService::validate_positive_score("score", score)?,
            },
            ReportRequest::Eighth { category_id, score } => ReportRequest::Eighth {
                category_id: ValidationService::validate_id("category_id", category_id)?,
                score: ValidationService::validate_positive_score("score", score)?,
            },
        })
    }
}

/// Loose report parameters as they arrive from a query string or the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "server",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
pub struct ReportParams {
    pub category: Option<String>,
    pub score: Option<f64>,
    pub restaurant: Option<String>,
    pub category_id: Option<i32>,
}

impl ReportParams {
    /// Pick the parameters `kind` needs. Unused parameters are ignored.
    pub fn into_request(self, kind: ReportKind) -> DirectoryResult<ReportRequest> {
        let request = match kind {
            ReportKind::First => ReportRequest::First {
                category: required("category", self.category)?,
                score: required("score", self.score)?,
            },
            ReportKind::Second => ReportRequest::Second {
                category: required("category", self.category)?,
            },
            ReportKind::Third => ReportRequest::Third {
                restaurant: required("restaurant", self.restaurant)?,
            },
            ReportKind::Fourth => ReportRequest::Fourth {
                restaurant: required("restaurant", self.restaurant)?,
            },
            ReportKind::Fifth => ReportRequest::Fifth,
            ReportKind::Sixth => ReportRequest::Sixth {
                category_id: required("category_id", self.category_id)?,
                score: required("score", self.score)?,
            },
            ReportKind::Seventh => ReportRequest::Seventh {
                score: required("score", self.score)?,
            },
            ReportKind::Eighth => ReportRequest::Eighth {
                category_id: required("category_id", self.category_id)?,
                score: required("score", self.score)?,
            },
        };
        Ok(request)
    }
}

fn required<T>(field: &str, value: Option<T>) -> DirectoryResult<T> {
    value.ok_or_else(|| DirectoryError::validation(field, "is required"))
}

/// Rows produced by a report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
    Restaurants(Vec<RestaurantName>),
    Customers(Vec<CustomerContact>),
    CheapestDish(Vec<CheapestDish>),
    Dishes(Vec<RestaurantDish>),
}

impl ReportOutput {
    pub fn len(&self) -> usize {
        match self {
            ReportOutput::Restaurants(rows) => rows.len(),
            ReportOutput::Customers(rows) => rows.len(),
            ReportOutput::CheapestDish(rows) => rows.len(),
            ReportOutput::Dishes(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only reporting service
#[derive(Clone)]
pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validate `request` and execute the report it names.
    pub async fn run(&self, request: ReportRequest) -> DirectoryResult<ReportOutput> {
        let request = request.validate()?;
        let kind = request.kind();

        let output = match request {
            ReportRequest::First { category, score } => ReportOutput::Restaurants(
                self.restaurants_above_avg_dish_score_in_category(&category, score)
                    .await?,
            ),
            ReportRequest::Second { category } => ReportOutput::Customers(
                self.customers_with_liked_restaurant_in_category(&category)
                    .await?,
            ),
            ReportRequest::Third { restaurant } => ReportOutput::Restaurants(
                self.restaurants_with_superset_of_categories(&restaurant)
                    .await?,
            ),
            ReportRequest::Fourth { restaurant } => ReportOutput::Restaurants(
                self.restaurants_with_exact_category_set(&restaurant).await?,
            ),
            ReportRequest::Fifth => {
                ReportOutput::Customers(self.customers_reviewing_every_category().await?)
            }
            ReportRequest::Sixth { category_id, score } => ReportOutput::CheapestDish(
                self.cheapest_dish_above_score_in_category(category_id, score)
                    .await?
                    .into_iter()
                    .collect(),
            ),
            ReportRequest::Seventh { score } => ReportOutput::Customers(
                self.customers_with_avg_review_score_below(score).await?,
            ),
            ReportRequest::Eighth { category_id, score } => ReportOutput::Dishes(
                self.dishes_in_category_with_restaurant_avg_above(category_id, score)
                    .await?,
            ),
        };

        debug!("Report {} returned {} rows", kind, output.len());
        Ok(output)
    }

    /// Restaurants whose dish reviews in `category` average at least `min_score`.
    pub async fn restaurants_above_avg_dish_score_in_category(
        &self,
        category: &str,
        min_score: f64,
    ) -> DirectoryResult<Vec<RestaurantName>> {
        self.fetch(
            ReportKind::First,
            RESTAURANTS_ABOVE_AVG_DISH_SCORE_IN_CATEGORY,
            vec![category.into(), min_score.into()],
        )
        .await
    }

    /// Distinct customers who liked at least one restaurant carrying `category`.
    pub async fn customers_with_liked_restaurant_in_category(
        &self,
        category: &str,
    ) -> DirectoryResult<Vec<CustomerContact>> {
        self.fetch(
            ReportKind::Second,
            CUSTOMERS_WITH_LIKED_RESTAURANT_IN_CATEGORY,
            vec![category.into()],
        )
        .await
    }

    /// Restaurants whose categories include every category of `restaurant`.
    pub async fn restaurants_with_superset_of_categories(
        &self,
        restaurant: &str,
    ) -> DirectoryResult<Vec<RestaurantName>> {
        self.fetch(
            ReportKind::Third,
            RESTAURANTS_WITH_SUPERSET_OF_CATEGORIES,
            vec![restaurant.into()],
        )
        .await
    }

    /// Restaurants whose category set equals the category set of `restaurant`.
    pub async fn restaurants_with_exact_category_set(
        &self,
        restaurant: &str,
    ) -> DirectoryResult<Vec<RestaurantName>> {
        self.fetch(
            ReportKind::Fourth,
            RESTAURANTS_WITH_EXACT_CATEGORY_SET,
            vec![restaurant.into()],
        )
        .await
    }

    pub async fn customers_reviewing_every_category(&self) -> DirectoryResult<Vec<CustomerContact>> {
        self.fetch(ReportKind::Fifth, CUSTOMERS_REVIEWING_EVERY_CATEGORY, vec![])
            .await
    }

    /// Cheapest dish of `category_id` whose dish reviews average at least
    /// `min_score`. Equal prices resolve to the dish created first.
    pub async fn cheapest_dish_above_score_in_category(
        &self,
        category_id: i32,
        min_score: f64,
    ) -> DirectoryResult<Option<CheapestDish>> {
        let rows: Vec<CheapestDish> = self
            .fetch(
                ReportKind::Sixth,
                CHEAPEST_DISH_ABOVE_SCORE_IN_CATEGORY,
                vec![category_id.into(), min_score.into()],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Customers whose restaurant-level reviews average at most `max_score`.
    pub async fn customers_with_avg_review_score_below(
        &self,
        max_score: f64,
    ) -> DirectoryResult<Vec<CustomerContact>> {
        self.fetch(
            ReportKind::Seventh,
            CUSTOMERS_WITH_AVG_REVIEW_SCORE_BELOW,
            vec![max_score.into()],
        )
        .await
    }

    /// Dishes of `category_id` served by restaurants whose reviews average at
    /// least `min_score`.
    pub async fn dishes_in_category_with_restaurant_avg_above(
        &self,
        category_id: i32,
        min_score: f64,
    ) -> DirectoryResult<Vec<RestaurantDish>> {
        self.fetch(
            ReportKind::Eighth,
            DISHES_IN_CATEGORY_WITH_RESTAURANT_AVG_ABOVE,
            vec![category_id.into(), min_score.into()],
        )
        .await
    }

    async fn fetch<T: FromQueryResult>(
        &self,
        kind: ReportKind,
        sql: &str,
        values: Vec<Value>,
    ) -> DirectoryResult<Vec<T>> {
        debug!("Executing report {} with {} parameters", kind, values.len());

        let statement = Statement::from_sql_and_values(self.db.get_database_backend(), sql, values);
        T::find_by_statement(statement)
            .all(&self.db)
            .await
            .map_err(|err| DirectoryError::from_db(&format!("report {}", kind), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_pick_what_the_report_needs() {
        let params = ReportParams {
            category: Some("Pizza".to_string()),
            score: Some(3.5),
            restaurant: Some("ignored".to_string()),
            category_id: None,
        };
        assert_eq!(
            params.into_request(ReportKind::First).unwrap(),
            ReportRequest::First {
                category: "Pizza".to_string(),
                score: 3.5
            }
        );
        assert_eq!(
            ReportParams::default().into_request(ReportKind::Fifth).unwrap(),
            ReportRequest::Fifth
        );
    }

    #[test]
    fn test_params_report_missing_fields() {
        let err = ReportParams {
            score: Some(2.0),
            ..Default::default()
        }
        .into_request(ReportKind::Eighth)
        .unwrap_err();
        assert_eq!(err.field(), Some("category_id"));
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_report_kind_round_trips_names() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
        }
        assert_eq!(" Third ".parse::<ReportKind>().unwrap(), ReportKind::Third);
        assert!("ninth".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_request_validation_rejects_non_positive_values() {
        let err = ReportRequest::First {
            category: "Dessert".to_string(),
            score: 0.0,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("score"));

        let err = ReportRequest::Sixth {
            category_id: 0,
            score: 3.0,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("category_id"));

        let err = ReportRequest::Third {
            restaurant: "  ".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("restaurant"));
    }

    #[test]
    fn test_request_validation_trims_strings() {
        let request = ReportRequest::Second {
            category: "  Vegan ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(
            request,
            ReportRequest::Second {
                category: "Vegan".to_string()
            }
        );
    }

    #[test]
    fn test_request_deserializes_from_tagged_json() {
        let request: ReportRequest = serde_json::from_value(serde_json::json!({
            "report": "eighth",
            "category_id": 2,
            "score": 4.0
        }))
        .unwrap();
        assert_eq!(request.kind(), ReportKind::Eighth);
    }

    #[test]
    fn test_output_serializes_as_plain_rows() {
        let output = ReportOutput::Restaurants(vec![RestaurantName {
            name: "Bistro".to_string(),
        }]);
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!([{ "name": "Bistro" }])
        );
        assert_eq!(output.len(), 1);
    }
}
