//! HTTP middleware.
//!
//! # Components
//!
//! - `introspection` - Token introspection layer and outcome lookup

pub mod introspection;

pub use introspection::{
    from_extensions, from_parts, from_request, resolve_outcome, Introspected, IntrospectionLayer,
    IntrospectionService,
};
