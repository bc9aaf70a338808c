//! beatleads: artist lead discovery with headless Chrome
//!
//! Stages:
//! - seeds: producer names from "{term} Type Beat" video search results
//! - discover: candidate artist profiles per producer
//! - profile: contact info (name, bio, email, socials) per profile

pub mod browser;
pub mod config;
pub mod discover;
pub mod error;
pub mod lead;
pub mod pipeline;
pub mod profile;
pub mod redirect;
pub mod render;
pub mod seeds;
pub mod signals;

pub use config::{Denylists, LeadsConfig};
pub use discover::{CandidateSet, ProfileDiscoverer};
pub use error::{LeadError, Result, SkipReason};
pub use lead::{LeadRecord, ScrapeResponse};
pub use pipeline::Pipeline;
pub use profile::{Extraction, ProfileExtractor};
pub use render::{PageRenderer, RenderedPage};
pub use seeds::SeedDiscoverer;
