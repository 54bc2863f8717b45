//! Filter and sort lookups for resource collections, validated against a field schema.
//!
//! ```
//! use rest_lookup::prelude::*;
//!
//! let schema = Schema::new()
//!     .field("name", Field::new().filterable().sortable())
//!     .field("age", Field::new().filterable().validator(Integer));
//!
//! let mut lookup = Lookup::new();
//! lookup.add_filter(r#"{"age": {"$gte": "18"}}"#, &schema).unwrap();
//! lookup.set_sort("-name", &schema).unwrap();
//!
//! assert_eq!(lookup.filter().to_string(), r#"{"age":{"$gte":18}}"#);
//! assert_eq!(lookup.sort(), &[Sort::descending("name")]);
//! ```

pub mod error;
pub mod hir;
pub mod lookup;
pub mod mir;
pub mod parser;
pub mod schema;

#[cfg(feature = "sea-orm")]
pub mod sea_orm;

pub mod prelude {
    pub use crate::error::Error;
    pub use crate::hir::Value;
    pub use crate::lookup::Lookup;
    pub use crate::mir::{Direction, Expression, Operator, Query, Sort};
    pub use crate::schema::*;
}

pub use error::Error;
pub use lookup::Lookup;

pub use ::chumsky;
