pub mod db_utils;
pub mod error;
pub mod numbering;
pub mod pagination;
pub mod validation;
