pub mod config;
pub mod error;
pub mod front_matter;
pub mod logger;
pub mod new_post;
pub mod post_list;
pub mod readme;
pub mod relations;
pub mod report;
pub mod schema;
pub mod validator;
mod test_data;

pub use error::{Error, Result};
