// handlers/security/mod.rs - Compliance check handlers
//
// Route Prefix: /security
// Every handler is a read-only GET that forwards to the platform APIs and
// answers 500 {"error", "code"} when any upstream call fails.

pub mod mfa;  // GET /security/mfa - MFA enrollment per user
pub mod pitr; // GET /security/pitr - point-in-time recovery per project
pub mod rls;  // GET /security/rls - row-level security per public table

// Re-export handler functions for use in routing
pub use mfa::get as mfa_get;
pub use pitr::get as pitr_get;
pub use rls::get as rls_get;
