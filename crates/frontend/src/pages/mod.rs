pub mod map_page;
pub mod report_page;
