//! wanderlist - a seasonal tourist destination browser.
//!
//! wanderlist keeps a catalog of destinations in a local
//! [redb](https://github.com/cberner/redb) database, narrows it down to the
//! places worth visiting in a given month, and ranks what is left against a
//! free-text query with TF-IDF cosine similarity.
//!
//! # Quick start
//!
//! ```no_run
//! use wanderlist::{CatalogCache, CatalogDb, DataDir, Planner, Transcript};
//! use wanderlist::filter::Criteria;
//! use wanderlist::months::Month;
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let catalog_db = CatalogDb::open(&data_dir.catalog_db()).unwrap();
//! let cache = CatalogCache::new(catalog_db);
//! let planner = Planner::new(cache.get().unwrap());
//!
//! let criteria = Criteria::for_month(Month::Jan)
//!     .with_categories(vec!["Heritage".to_string()]);
//!
//! let mut transcript = Transcript::new();
//! let answer = planner.ask(&mut transcript, &criteria, "ancient temples");
//! for (dest, score) in &answer.results {
//!     println!("{} ({}) score: {score:.3}", dest.name, dest.state);
//! }
//! ```

pub mod catalog;
pub mod catalog_db;
pub mod cli;
pub mod data_dir;
pub mod destination;
pub mod error;
pub mod filter;
pub mod image;
pub mod import;
pub mod months;
pub mod planner;
pub mod ranker;
pub mod render;
pub mod transcript;

pub use catalog::{Catalog, CatalogCache, CatalogSource};
pub use catalog_db::CatalogDb;
pub use data_dir::DataDir;
pub use destination::{CatalogRow, Destination};
pub use error::{Error, Result};
pub use planner::Planner;
pub use transcript::Transcript;
