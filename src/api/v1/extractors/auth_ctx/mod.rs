/*!
 * Authenticated request context for handlers
 *
 * Responsibility:
 * - Hand the RequestAuthState bound by the access middleware to handlers
 * - Per-operation scope check (`AuthCtx::require_scope`)
 *
 * Public API:
 * - AuthCtx
 */

mod core;
mod types;

pub use types::AuthCtx;
