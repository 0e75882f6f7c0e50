//! HTTP protocol handling for a single request per connection.
//!
//! # Architecture
//!
//! - **`connection`**: drives one accepted connection from receive to close
//! - **`parser`**: pulls the method and target out of the first received chunk
//! - **`request`**: the parsed request line
//! - **`response`**: status codes, the fixed pages, and the response builder
//! - **`writer`**: frames a response and sends it as a header write plus a body write
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← First non-empty chunk from the peer
//!        └──────┬──────┘
//!               │ Chunk received (EOF or error → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse and pick 200/400/404/405
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Header block, then body
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
