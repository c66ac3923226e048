// Domain layer: DTOs and ports (interfaces). No HTTP details here.

pub mod model;
pub mod ports;
