// Domain layer: roster models and ports (interfaces) to stores and storage.

pub mod model;
pub mod ports;
