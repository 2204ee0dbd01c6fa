pub mod config;
pub mod logging;

pub mod cells;
pub mod checksum;
pub mod fetch;
pub mod filetype;
pub mod import;
pub mod import_state;
pub mod inspect;
pub mod link;
pub mod resolver;
pub mod staging;
pub mod stats;
pub mod token;
