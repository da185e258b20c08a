// SPDX-License-Identifier: MIT
//
// stempel-imaging — Single-image enhancement and watermark pipeline.
//
// Provides the fixed filter chain (sharpen, edge enhance, contrast, smooth),
// the shadowed label overlay, bounded font caching, and the JSON request
// contract used by the `stempel` binary and by embedding hosts.

pub mod api;
pub mod fonts;
pub mod pipeline;

pub use fonts::FontCache;
pub use pipeline::processor::Processor;
