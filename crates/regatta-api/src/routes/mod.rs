//! # Route Modules
//!
//! | Prefix            | Module       | Auth    |
//! |-------------------|--------------|---------|
//! | `/v1/documents/*` | [`documents`]| session |
//! | `/v1/preview`     | [`documents`]| session |
//! | `/v1/rules/*`     | [`rules`]    | session |
//! | `/v1/auth/*`      | [`session`]  | none    |
//! | `/v1/config`      | [`session`]  | none    |

pub mod documents;
pub mod rules;
pub mod session;
