pub mod force_graph;

mod header;
mod inspector;
mod ring_details;
mod sar_panel;
mod triage;
mod upload;

pub use header::Header;
pub use inspector::InspectorPanel;
pub use ring_details::RingDetailsPanel;
pub use sar_panel::SarPanel;
pub use triage::TriageList;
pub use upload::UploadScreen;
