pub mod binary;
pub mod buf;
pub mod cipher;
pub mod padding;
pub mod stream;
