pub mod api;
pub mod importer;
pub mod models;
pub mod notify;
pub mod sink;
pub mod transform;
