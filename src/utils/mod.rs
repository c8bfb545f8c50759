pub mod csv_export;
pub mod db_errors;
pub mod db_utils;
pub mod email_index;
