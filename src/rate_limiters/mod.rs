pub mod flood;

pub use flood::FloodGuard;
