//! # Response Factory
//!
//! The one place response values are assembled. Success bodies pass
//! through; stateful errors are flattened onto the stable `(kind, code)`
//! surface plus a human-readable message. Every response echoes the
//! originating query hash.

use shared_types::Hash;

use super::errors::QueryError;
use super::response::{ErrorResponse, QueryResponse, ResponsePayload};

/// Builds tagged response values.
pub struct ResponseFactory;

impl ResponseFactory {
    /// Wraps a success body.
    pub fn success(query_hash: Hash, payload: ResponsePayload) -> QueryResponse {
        QueryResponse {
            query_hash,
            payload,
        }
    }

    /// Builds the error response for a stateful failure.
    pub fn error(query_hash: Hash, error: &QueryError) -> QueryResponse {
        QueryResponse {
            query_hash,
            payload: ResponsePayload::Error(ErrorResponse {
                kind: error.kind(),
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}
