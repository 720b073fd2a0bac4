/// Router Module Index
///
/// Organizes the routing surface into access-segregated modules so the session
/// requirement is applied explicitly at the module level (via an Axum
/// route_layer), never per-handler by convention.
///
/// The two modules map directly to the two access classes of the API.

/// Routes accessible to any client: browsing content and the auth gateway
/// itself (signup/login/logout).
pub mod public;

/// Routes guarded by the session middleware. Requires a valid `fv_token`
/// cookie or Bearer token.
pub mod authenticated;
