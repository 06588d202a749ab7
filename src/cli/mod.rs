pub mod validate_parity;
