// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod embedding {
    pub mod v1 {
        include!("embedding.v1.rs");
        // embedding.v1.tonic.rs is auto-included by embedding.v1.rs
    }
}
