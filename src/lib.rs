pub mod appearance;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod layouts;
pub mod model;
pub mod pool;
pub mod shapes;
pub mod surface;
