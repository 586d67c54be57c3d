pub mod app;
pub mod frame_clock;
pub mod panel;

pub use app::{PanelRuntime, run_frame_loop};
pub use frame_clock::{FrameClock, Tick};
pub use panel::Panel;
