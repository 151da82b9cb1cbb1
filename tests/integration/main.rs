//! HTTP-level integration tests over in-memory stores.

mod account_test;
mod auth_test;
mod helpers;
mod rbac_test;
mod role_graph_test;
mod user_admin_test;
