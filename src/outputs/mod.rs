//! Output generation for scrape results.
//!
//! # Submodules
//!
//! - [`json`]: Writes each [`ScrapeResponse`](crate::models::ScrapeResponse)
//!   to a JSON file, one directory per source
//! - [`markdown`]: Renders a response as a Markdown digest for reading
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── news-example/
//! │   ├── 2025-05-06T08-15-02.113Z.json
//! │   └── 2025-05-06T12-40-51.907Z.json
//! └── ledger-example/
//!     └── 2025-05-06T08-15-03.020Z.json
//! ```

pub mod json;
pub mod markdown;
