// SPDX-License-Identifier: MIT
//
// The fixed enhancement-and-watermark pipeline.

pub mod filters;
pub mod processor;
pub mod watermark;

pub use processor::Processor;
