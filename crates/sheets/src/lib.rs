//! Spreadsheet persistence - the tabular store behind confirmed entries
//!
//! This crate implements the `TimesheetGateway` seam from `shiftbot-core`
//! against the Google Sheets REST API:
//! - **Auth** (`auth`) - service-account JWT exchange with token caching
//! - **Client** (`client`) - thin value read/write/append calls
//! - **Rows** (`rows`) - pure row-selection and cell-building policy
//! - **Gateway** (`gateway`) - write policy plus the one-reconnect retry
//!
//! # Write contract
//!
//! Only the three raw fields (date, start, end) are ever written, into
//! columns A-C. Derived hour/pay columns belong to the sheet's own formulas
//! and are read but never written. A failed write triggers exactly one
//! reconnect and one unconditional append before the failure is reported.

pub mod auth;
pub mod client;
pub mod gateway;
pub mod rows;

pub use auth::{AuthError, TokenProvider};
pub use client::{SheetsClient, SheetsError};
pub use gateway::SheetsGateway;
