//! # resona-provider
//!
//! HTTP clients for the upstream music service: the identity provider
//! (OAuth authorization-code exchange, profile resolution) and the catalog
//! provider (top artists/tracks per time horizon).
//!
//! Both clients are thin, stateless wrappers over `reqwest` that map
//! provider failures onto the resona error sum type: 401 becomes
//! `Error::TokenExpired`, token-exchange rejections become
//! `Error::UpstreamAuth`, and anything else surfaces the provider's error
//! body verbatim in `Error::Upstream`.

pub mod catalog;
pub mod identity;

pub use catalog::CatalogClient;
pub use identity::IdentityClient;
