//! Video link extraction and resolution to a direct media URL.
//!
//! A [`VideoResolver`] walks an ordered [`CredentialSet`] against a single
//! [`MediaLookup`] provider and returns the first non-empty media URL.

pub mod error;
pub mod failover;
pub mod link;
pub mod provider;
pub mod rapidapi;
pub mod resolver;

pub use {
    error::{Error, Result},
    failover::{Exhausted, first_success},
    link::extract_video_link,
    provider::MediaLookup,
    rapidapi::RapidApiLookup,
    resolver::{CredentialSet, VideoResolver},
};
