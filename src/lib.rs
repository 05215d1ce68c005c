// ==============================================================================
// lib.rs - ksnp to VCF Converter Library
// ==============================================================================
// Description: Library interface for ksnp parsing, VCF rendering and partitioning
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod models;
pub mod parsers;
pub mod output;
pub mod partition;
pub mod converter;
