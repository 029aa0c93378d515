pub mod bert;
pub mod sentiment;
