//! Terminal output for the shopify-guards command-line tools
//!
//! - Status messages
//! - Error reports with suggestions
//! - Validation listings

#![warn(missing_docs)]

pub mod output;
