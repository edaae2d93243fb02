pub mod db;
pub mod upload;
