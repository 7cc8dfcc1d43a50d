pub mod json;
pub mod text;

pub use json::write_frame_json;
pub use text::render_frame_summary;
