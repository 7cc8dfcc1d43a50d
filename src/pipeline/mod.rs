pub mod clone_plot;
pub mod link;
pub mod selection;
pub mod serve;
pub mod session;
