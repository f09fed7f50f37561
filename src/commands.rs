pub mod analyze;
pub mod check_url;
pub mod tokenize;
