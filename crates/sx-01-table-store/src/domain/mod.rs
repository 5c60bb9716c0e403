pub mod errors;
pub mod row;
pub mod schema;

pub use errors::*;
pub use row::*;
pub use schema::*;
