pub mod calculator;
pub mod catalog;
pub mod changes;
pub mod debounce;
pub mod error;
pub mod pricing;
pub mod savings;
pub mod scenario;
pub mod schema;
pub mod selection;

pub use calculator::*;
pub use catalog::*;
pub use changes::*;
pub use debounce::*;
pub use error::*;
pub use pricing::*;
pub use savings::*;
pub use scenario::*;
pub use schema::*;
pub use selection::*;
