pub mod carousel;
pub mod chart;
pub mod dashboard;
pub mod movers;
