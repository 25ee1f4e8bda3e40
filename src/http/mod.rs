//! HTTP/1.1 request line handling and response writing.
//!
//! One connection carries exactly one request. There is no keep-alive, no
//! header parsing and no request body.
//!
//! - **`connection`**: per-connection state machine
//! - **`parser`**: validates the request line
//! - **`request`**: the validated request
//! - **`response`**: status codes and the two response shapes
//! - **`writer`**: serializes and writes a response, then closes the write half
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read of up to 1024 bytes
//!        └──────┬──────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve, load file
//!        └──────┬───────────┘
//!               │ Response ready, status logged
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
