//! HTTP plumbing shared by all routes

pub mod middleware;
