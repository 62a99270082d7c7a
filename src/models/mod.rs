pub mod envelope;
pub mod review;
