//! Value typing and backend literal encoding.
//!
//! - [`classify()`]: raw text → [`crate::types::TypeTag`]
//! - [`encode()`]: raw text + tag → backend literal
//! - [`RowRecord`]: one row as column/literal pairs, rendered per backend
//!
//! ## Example: the same row for both backends
//!
//! ```rust
//! use seed_loader::encoding::{RowRecord, sql_insert_script, graph_object_list};
//! use seed_loader::ingestion::{read_dataset_from_reader, reader_from_str};
//!
//! let mut rdr = reader_from_str("id,name,active,price\n,Bad,,\n");
//! let ds = read_dataset_from_reader(&mut rdr, "products").unwrap();
//! let records = RowRecord::from_dataset(&ds);
//!
//! assert_eq!(
//!     sql_insert_script(&records),
//!     r#"INSERT INTO "products" ("id", "name", "active", "price") VALUES (NULL, 'Bad', NULL, NULL);"#
//! );
//! assert_eq!(graph_object_list(&records), r#"[{name: "Bad"}]"#);
//! ```

mod classify;
mod literal;

pub use classify::classify;
pub use literal::{encode, graph_object_list, quote_ident, sql_insert_script, Literal, RowRecord};
