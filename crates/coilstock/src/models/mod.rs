mod coil;

pub use coil::{DeleteCoilQuery, RegisterCoil, UpdateCoil};
