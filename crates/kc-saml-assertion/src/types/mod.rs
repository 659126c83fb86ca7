//! SAML 2.0 assertion model.
//!
//! This module contains the strongly typed view of an assertion consumed by
//! the validators, along with the names and URIs they dispatch on.

mod assertion;
mod conditions;
mod constants;
mod key_info;
mod name_id;
mod qname;
mod statements;

pub use assertion::*;
pub use conditions::*;
pub use constants::*;
pub use key_info::*;
pub use name_id::*;
pub use qname::*;
pub use statements::*;
