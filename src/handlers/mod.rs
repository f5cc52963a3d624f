// handlers/mod.rs - one file per endpoint
//
// api/     JSON reading endpoints under /api (latest, history, status, all)
// health   process liveness and store configuration report
//
// The dashboard itself is static and served straight from disk by the router.
pub mod api;
pub mod health;

pub use health::health;
