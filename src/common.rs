pub mod db_errors;
pub mod grouping;
