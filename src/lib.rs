//! Asynchronous OCR pipeline.
//!
//! A client uploads an image or PDF and immediately receives a job id. Workers
//! rasterize PDFs, run every page through the OCR engine, rejoin words split by
//! line-end hyphens and publish the text as `<job_id>.txt`, which the client
//! downloads once it exists.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
