pub mod client;

pub use client::{check_envelope, file_part, BackendHttpClient};
