mod chart;
pub use chart::ChartView;

mod test_section;
pub use test_section::TestSectionCard;

mod export_panel;
pub use export_panel::ExportPanel;
