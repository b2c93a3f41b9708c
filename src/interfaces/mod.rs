//! Inbound adapters: JSON REST API and the server-rendered listing page.

pub mod http;
pub mod web;
