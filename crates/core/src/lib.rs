//! Domain types shared by the Gophic resize client.
//!
//! Holds the job model (identifiers, status, results), resize algorithms,
//! target dimensions and resize-mode helpers, the base64 image payload, and
//! result file naming. Nothing here performs I/O beyond reading an image
//! header from an in-memory buffer.

pub mod algorithm;
pub mod dimensions;
pub mod error;
pub mod job;
pub mod naming;
pub mod payload;
pub mod types;
