//! Domain layer: query and response values, the permission requirement
//! table, the authorizer, and the response factory.

pub mod authorizer;
pub mod config;
pub mod errors;
pub mod factory;
pub mod query;
pub mod requirements;
pub mod response;

pub use authorizer::{authorize, has_root, permissions_of};
pub use config::EngineConfig;
pub use errors::{error_code, QueryError};
pub use factory::ResponseFactory;
pub use query::{
    AssetPaginationMeta, BlocksQuery, DetailPaginationMeta, Query, QueryKind, QueryPayload,
    TxPaginationMeta,
};
pub use response::{
    AccountAssetsResponse, AccountDetailResponse, AccountResponse, AssetResponse, BlockResponse,
    ErrorResponse, PeersResponse, PendingTransactionsPageResponse, QueryErrorKind, QueryResponse,
    ResponsePayload, RolePermissionsResponse, RolesResponse, SignatoriesResponse,
    TransactionsPageResponse, TransactionsResponse,
};
