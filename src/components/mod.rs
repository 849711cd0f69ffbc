pub mod app;
pub mod camera_controls;
pub mod event_log;
pub mod settings_modal;
pub mod viewer;
