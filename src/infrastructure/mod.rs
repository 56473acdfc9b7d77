pub mod console;
pub mod devices;
pub mod emitter;
pub mod logging;
pub mod remote;
