pub mod double_double;

pub use double_double::DoubleDouble;
