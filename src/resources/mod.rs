//! Resource façades.
//!
//! Each façade is a borrowed view over the client's executor. A method maps
//! to exactly one method + path and decodes the response; there is no
//! validation, caching or retry here, and every error comes from the
//! executor unchanged.

pub mod entities;
pub mod evidence;
pub mod promises;
pub mod scores;
pub mod webhooks;

pub use entities::Entities;
pub use evidence::EvidenceApi;
pub use promises::Promises;
pub use scores::Scores;
pub use webhooks::Webhooks;
