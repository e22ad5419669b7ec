pub mod chart;
pub mod index;
pub mod instrument;
pub mod period;
pub mod response;
pub mod settings;
