mod from_google;
mod to_google;
pub mod wire;

pub use from_google::FromGoogle;
pub use to_google::ToGoogle;

/// Extended property holding the source event's iCalUID.
pub const CORRELATION_PROPERTY: &str = "origICalUID";
