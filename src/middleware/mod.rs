/*
 * Responsibility
 * - Router-level layers: http (request id, trace, limits), cors, security headers
 * - auth::access: per-route token check
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
