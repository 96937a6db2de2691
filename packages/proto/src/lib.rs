//! Generated gRPC bindings for Tiffin services.

pub mod payments {
    tonic::include_proto!("payments");
}
