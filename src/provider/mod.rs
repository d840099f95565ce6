pub(crate) mod constants;
pub mod xai;

pub use xai::{XaiClient, XaiConfig};
