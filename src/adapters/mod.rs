// Adapters layer: decoding for payloads produced by external collaborators.

pub mod neis;
