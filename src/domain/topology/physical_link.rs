use crate::domain::schedule::data_transmission::DataTransmission;

/// A bandwidth limited channel of a compute node.
///
/// Holds every transmission that uses this link, either as the sending or as the receiving side.
#[derive(Debug, Clone, Default)]
pub struct PhysicalLink {
    /// `0..link_count`
    pub number: usize,
    pub transmissions: Vec<DataTransmission>,
}

impl PhysicalLink {
    pub fn new(number: usize) -> Self {
        Self { number, transmissions: Vec::new() }
    }
}
