pub mod db;
pub mod password;
pub mod students;
pub mod token;
