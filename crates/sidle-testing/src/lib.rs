//! Testing utilities and harness for Sidle.

mod robot;

pub use robot::DrawerRobot;
