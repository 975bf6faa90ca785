//! Digital I/O vocabulary shared by the control engine and HAL backends.

pub mod lights;
pub mod line;
