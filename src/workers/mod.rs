pub mod cache_invalidator;
