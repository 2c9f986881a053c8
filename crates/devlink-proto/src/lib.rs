//! Wire protocol for devlink.
//!
//! The generated types double as the field whitelist: the update request can
//! express exactly the writable profile fields and nothing else, so the
//! server and every client share one schema and cannot drift.

tonic::include_proto!("devlink");
