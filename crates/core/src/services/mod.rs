pub mod chart_service;
pub mod format_service;
pub mod sample_data;
pub mod state_service;
