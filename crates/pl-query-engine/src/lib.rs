//! # Query Engine
//!
//! The read side of the ledger: given a well-formed query against
//! committed state, authorize the caller, execute against one consistent
//! snapshot, and return a typed response or a stable-coded error.
//!
//! ## Control flow
//!
//! ```text
//! Query ──→ QueryExecutor ──→ Authorizer (requirement table, tri-scope + root + grants)
//!                 │
//!                 ├──→ WorldStateView  (snapshot, pinned per execution)
//!                 ├──→ BlockQuery      (clamped to the snapshot height)
//!                 └──→ PendingPoolReader (real-time)
//!                 │
//!                 └──→ ResponseFactory ──→ QueryResponse
//! ```
//!
//! Nothing in this crate writes. Error precedence per handler is fixed:
//! authorization, id-validity, pagination validity, entity existence.
//! The error-code surface is stable: 0 no stateful error, 2 no
//! permissions, 3 invalid height, 4 invalid pagination, 5 invalid account
//! id, 6 invalid asset id.

pub mod domain;
pub mod service;

pub use domain::{
    authorize, error_code, has_root, permissions_of, AccountAssetsResponse,
    AccountDetailResponse, AccountResponse, AssetPaginationMeta, AssetResponse, BlockResponse,
    BlocksQuery, DetailPaginationMeta, EngineConfig, ErrorResponse, PeersResponse,
    PendingTransactionsPageResponse, Query, QueryError, QueryErrorKind, QueryKind, QueryPayload,
    QueryResponse, ResponseFactory, ResponsePayload, RolePermissionsResponse, RolesResponse,
    SignatoriesResponse, TransactionsPageResponse, TransactionsResponse, TxPaginationMeta,
};
pub use service::QueryExecutor;
