//! Access token claims and the HS512 codec.

pub mod claims;
pub mod codec;

pub use claims::AccessTokenClaims;
pub use codec::{IssuedToken, TokenCodec};
