//! Hardware abstraction seams.
//!
//! The control engine only talks to hardware through the traits in
//! [`driver`]. Backends (simulation, GPIO boards) live in `rcc_hal`.

pub mod driver;
