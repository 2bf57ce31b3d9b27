pub mod filter_bar;
pub mod incident_card;
pub mod map_view;
