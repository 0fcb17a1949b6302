// Domain layer: request-scoped models and the ports to the two remote services.

pub mod model;
pub mod ports;
