pub mod compute_node;
pub mod physical_link;
pub mod topology;
