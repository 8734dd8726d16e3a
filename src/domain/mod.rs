// Domain layer: schedule model and the ports the I/O shell is built on.

pub mod model;
pub mod ports;
