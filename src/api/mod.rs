//! Client for the DH-lab lexical research API.
//!
//! # Example
//!
//! ```no_run
//! use leksemvariasjon_core::api::ApiClient;
//! use leksemvariasjon_core::query::ConcordanceQuery;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new()?;
//! let query = ConcordanceQuery {
//!     dhlabids: vec![100_123],
//!     limit: 100,
//!     query: "gikk".to_string(),
//!     window: 25,
//!     html_formatting: false,
//! };
//! let concordances = client.fetch_concordance(&query).await?;
//! println!("{} lines", concordances.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod records;

pub use client::{ApiClient, CONCORDANCE_ENDPOINT, CORPUS_ENDPOINT, DHLAB_API_URL};
pub use error::ApiError;
pub use records::{ConcordanceRecord, CorpusRecord};
