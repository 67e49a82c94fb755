pub mod observability;
pub mod ocr;
pub mod persistence;
pub mod rasterizer;
pub mod storage;
