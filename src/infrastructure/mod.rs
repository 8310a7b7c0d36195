pub mod db;
pub mod events;
pub mod redis;
pub mod storage;
