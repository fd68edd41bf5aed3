pub mod app;
pub mod avatars;
pub mod config;
pub mod export;
pub mod feeds;
pub mod logging;
pub mod markup;
pub mod months;
pub mod pager;
pub mod routes;
pub mod store;
pub mod ui;
pub mod virtualizer;
