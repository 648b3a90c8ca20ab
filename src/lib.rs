//! Assemble Reports - AI-assisted report generation for assemble.ai
//!
//! This crate implements the tender-report generation workflow (TOC drafting,
//! human-in-the-loop approval, per-section generation with retrieval) and the
//! rule-based inference engine that suggests objectives and stakeholders from
//! project profile data.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
