//! Template renderer adapters.

mod delimiter;

pub use delimiter::DelimiterRenderer;
